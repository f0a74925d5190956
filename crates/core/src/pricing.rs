//! # Pricing
//!
//! Rooms bound to a court split the court rental among confirmed players;
//! rooms without a court charge a flat per-person amount.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tariff {
    Court { hourly_price: f64 },
    Flat { per_person: f64 },
}

impl Tariff {
    pub fn for_room(court_hourly_price: Option<f64>, flat_price: f64) -> Self {
        match court_hourly_price {
            Some(hourly_price) => Tariff::Court { hourly_price },
            None => Tariff::Flat {
                per_person: flat_price,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPrice {
    pub tariff: Tariff,
    pub total: f64,
    pub per_person: f64,
    pub confirmed_count: usize,
}

pub fn quote(tariff: Tariff, duration_hours: i32, confirmed_count: usize) -> RoomPrice {
    let (total, per_person) = match tariff {
        Tariff::Court { hourly_price } => {
            let total = round_cents(hourly_price * f64::from(duration_hours.max(0)));
            let per_person = if confirmed_count == 0 {
                0.0
            } else {
                round_cents(total / confirmed_count as f64)
            };
            (total, per_person)
        }
        Tariff::Flat { per_person } => {
            let per_person = round_cents(per_person);
            (round_cents(per_person * confirmed_count as f64), per_person)
        }
    };

    RoomPrice {
        tariff,
        total,
        per_person,
        confirmed_count,
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
