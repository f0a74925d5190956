use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::{Interval, Reservation};
use crate::errors::{BookingError, BookingResult};
use crate::pricing::RoomPrice;
use crate::waitlist::SeatStatus;

pub const DEFAULT_CITY: &str = "Não informada";
pub const MIN_PARTICIPANTS: i32 = 2;
pub const MAX_DURATION_HOURS: i32 = 24;

/// Accepted input layouts for room dates, tried after RFC 3339.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Years a room or day query may name. Keeps `date + duration` in range.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=9999;

fn ensure_supported_year(year: i32, raw: &str) -> BookingResult<()> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(BookingError::Validation(format!(
            "Date '{}' is out of range, the year must be between {} and {}",
            raw.trim(),
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub sport: String,
    pub date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    pub description: Option<String>,
    pub city: String,
    pub location: Option<String>,
    pub link_code: String,
    pub is_private: bool,
    pub is_active: bool,
    pub creator_id: Uuid,
    pub court_id: Option<Uuid>,
    pub price_per_person: f64,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.date + chrono::Duration::hours(i64::from(self.duration_hours))
    }

    /// The `[date, end_time)` window this room occupies on its court.
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.date,
            end: self.end_time(),
        }
    }

    pub fn reservation(&self) -> Reservation {
        Reservation {
            room_id: self.id,
            interval: self.interval(),
            is_active: self.is_active,
        }
    }

    /// Capacity as a list length; negative stored values count as zero seats.
    pub fn capacity(&self) -> usize {
        usize::try_from(self.max_participants).unwrap_or(0)
    }
}

/// Parses a room date, either RFC 3339 or the `YYYY-MM-DDTHH:MM` layout
/// produced by `datetime-local` inputs (interpreted as UTC).
pub fn parse_room_date(raw: &str) -> BookingResult<DateTime<Utc>> {
    let raw = raw.trim();
    let date = match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.with_timezone(&Utc),
        Err(_) => DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
            .ok_or_else(|| {
                BookingError::Validation(format!(
                    "Invalid date '{}', expected YYYY-MM-DDTHH:MM",
                    raw
                ))
            })?,
    };

    ensure_supported_year(date.year(), raw)?;
    Ok(date)
}

pub fn parse_day(raw: &str) -> BookingResult<NaiveDate> {
    let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        BookingError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })?;

    ensure_supported_year(day.year(), raw)?;
    Ok(day)
}

/// Payload for creating or editing a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRequest {
    pub name: String,
    pub sport: String,
    pub date: String,
    pub duration_hours: Option<i32>,
    pub max_participants: i32,
    pub city: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub court_id: Option<Uuid>,
    pub price_per_person: Option<f64>,
}

/// A validated [`RoomRequest`] ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDraft {
    pub name: String,
    pub sport: String,
    pub date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    pub city: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_private: bool,
    pub court_id: Option<Uuid>,
    pub price_per_person: f64,
}

impl RoomDraft {
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.date,
            end: self.date + chrono::Duration::hours(i64::from(self.duration_hours)),
        }
    }
}

impl RoomRequest {
    pub fn validate(&self) -> BookingResult<RoomDraft> {
        let name = self.name.trim();
        if !(3..=100).contains(&name.chars().count()) {
            return Err(BookingError::Validation(
                "Room name must be between 3 and 100 characters".to_string(),
            ));
        }

        let sport = self.sport.trim();
        if !(2..=50).contains(&sport.chars().count()) {
            return Err(BookingError::Validation(
                "Sport must be between 2 and 50 characters".to_string(),
            ));
        }

        let date = parse_room_date(&self.date)?;

        let duration_hours = self.duration_hours.unwrap_or(1);
        if !(1..=MAX_DURATION_HOURS).contains(&duration_hours) {
            return Err(BookingError::Validation(format!(
                "Duration must be between 1 and {} hours",
                MAX_DURATION_HOURS
            )));
        }

        if self.max_participants < MIN_PARTICIPANTS {
            return Err(BookingError::Validation(format!(
                "A room needs at least {} participants",
                MIN_PARTICIPANTS
            )));
        }

        let city = non_empty(self.city.as_deref()).unwrap_or_else(|| DEFAULT_CITY.to_string());
        let location = non_empty(self.location.as_deref());
        if location.as_ref().is_some_and(|l| l.chars().count() > 200) {
            return Err(BookingError::Validation(
                "Location must be at most 200 characters".to_string(),
            ));
        }

        let description = non_empty(self.description.as_deref());
        if description.as_ref().is_some_and(|d| d.chars().count() > 500) {
            return Err(BookingError::Validation(
                "Description must be at most 500 characters".to_string(),
            ));
        }

        let price_per_person = self.price_per_person.unwrap_or(0.0);
        if !price_per_person.is_finite() || price_per_person < 0.0 {
            return Err(BookingError::Validation(
                "Price per person must be a non-negative amount".to_string(),
            ));
        }

        Ok(RoomDraft {
            name: name.to_string(),
            sport: sport.to_string(),
            date,
            duration_hours,
            max_participants: self.max_participants,
            city,
            location,
            description,
            is_private: self.is_private,
            court_id: self.court_id,
            price_per_person,
        })
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Admin edit: the regular room fields plus the lifecycle flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRoomUpdate {
    #[serde(flatten)]
    pub room: RoomRequest,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomQuery {
    pub sport: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminRoomQuery {
    pub sport: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: Uuid,
    pub link_code: String,
    pub name: String,
    pub sport: String,
    pub date: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: i32,
    pub city: String,
    pub location: Option<String>,
    pub max_participants: i32,
    pub confirmed_count: usize,
    pub waiting_count: usize,
    pub is_private: bool,
    pub is_active: bool,
    pub court_id: Option<Uuid>,
}

impl RoomSummary {
    pub fn new(room: &Room, confirmed_count: usize, waiting_count: usize) -> Self {
        Self {
            id: room.id,
            link_code: room.link_code.clone(),
            name: room.name.clone(),
            sport: room.sport.clone(),
            date: room.date,
            end_time: room.end_time(),
            duration_hours: room.duration_hours,
            city: room.city.clone(),
            location: room.location.clone(),
            max_participants: room.max_participants,
            confirmed_count,
            waiting_count,
            is_private: room.is_private,
            is_active: room.is_active,
            court_id: room.court_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub upcoming: Vec<RoomSummary>,
    pub past: Vec<RoomSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub registered_at: DateTime<Utc>,
    pub checked_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailResponse {
    pub room: RoomSummary,
    pub description: Option<String>,
    pub creator_id: Uuid,
    pub is_owner: bool,
    pub is_participating: bool,
    pub my_seat: Option<SeatStatus>,
    pub confirmed: Vec<ParticipantView>,
    pub waiting: Vec<ParticipantView>,
    pub price: RoomPrice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub participant_id: Uuid,
    pub seat: SeatStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Calendar-style room record used by the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRoomRecord {
    pub id: Uuid,
    pub link_code: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sport: String,
    pub max_participants: i32,
    pub current_participants: usize,
    pub location: Option<String>,
    pub city: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub is_active: bool,
    pub court_id: Option<Uuid>,
    pub price_per_person: f64,
}

impl AdminRoomRecord {
    pub fn new(room: &Room, current_participants: usize) -> Self {
        Self {
            id: room.id,
            link_code: room.link_code.clone(),
            title: format!("{} - {}", room.name, room.sport),
            start: room.date,
            end: room.end_time(),
            sport: room.sport.clone(),
            max_participants: room.max_participants,
            current_participants,
            location: room.location.clone(),
            city: room.city.clone(),
            description: room.description.clone(),
            is_private: room.is_private,
            is_active: room.is_active,
            court_id: room.court_id,
            price_per_person: room.price_per_person,
        }
    }
}
