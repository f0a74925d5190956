use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::HourSlot;
use crate::errors::{BookingError, BookingResult};
use crate::models::room::non_empty;

pub const DEFAULT_SPORT_TYPE: &str = "Outros";
pub const DEFAULT_CAPACITY: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub id: Uuid,
    pub name: String,
    pub sport_type: String,
    pub location: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub hourly_price: f64,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtRequest {
    pub name: String,
    pub sport_type: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub hourly_price: f64,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourtDraft {
    pub name: String,
    pub sport_type: String,
    pub location: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub hourly_price: f64,
    pub capacity: i32,
    pub is_active: bool,
}

impl CourtRequest {
    pub fn validate(&self) -> BookingResult<CourtDraft> {
        let name = self.name.trim();
        if !(2..=100).contains(&name.chars().count()) {
            return Err(BookingError::Validation(
                "Court name must be between 2 and 100 characters".to_string(),
            ));
        }

        if !self.hourly_price.is_finite() || self.hourly_price < 0.0 {
            return Err(BookingError::Validation(
                "Hourly price must be a non-negative amount".to_string(),
            ));
        }

        let capacity = self.capacity.unwrap_or(DEFAULT_CAPACITY);
        if capacity < 1 {
            return Err(BookingError::Validation(
                "Court capacity must be at least 1".to_string(),
            ));
        }

        Ok(CourtDraft {
            name: name.to_string(),
            sport_type: non_empty(self.sport_type.as_deref())
                .unwrap_or_else(|| DEFAULT_SPORT_TYPE.to_string()),
            location: non_empty(self.location.as_deref()),
            city: non_empty(self.city.as_deref()),
            description: non_empty(self.description.as_deref()),
            hourly_price: self.hourly_price,
            capacity,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub open: Option<u32>,
    pub close: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtAvailabilityResponse {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub hourly_price: f64,
    pub slots: Vec<HourSlot>,
}
