//! # Court Availability
//!
//! Reservations on a court are the `[date, end_time)` windows of the active
//! rooms bound to it. Two windows conflict when
//! `a.start < b.end && a.end > b.start`, so back-to-back bookings that share
//! an endpoint are allowed.
//!
//! The same test drives both booking validation ([`find_conflict`]) and the
//! per-hour availability grid shown for a day ([`hourly_slots`]).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

pub const DEFAULT_OPEN_HOUR: u32 = 6;
pub const DEFAULT_CLOSE_HOUR: u32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> BookingResult<Self> {
        if end <= start {
            return Err(BookingError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn for_booking(start: DateTime<Utc>, duration_hours: i32) -> BookingResult<Self> {
        if duration_hours <= 0 {
            return Err(BookingError::Validation(
                "Duration must be at least one hour".to_string(),
            ));
        }
        let end = start
            .checked_add_signed(Duration::hours(i64::from(duration_hours)))
            .ok_or_else(|| BookingError::Validation("Booking ends out of the supported date range".to_string()))?;
        Ok(Self { start, end })
    }

    /// The whole UTC day `[00:00, next 00:00)`.
    pub fn day(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A room's hold on a court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub room_id: Uuid,
    pub interval: Interval,
    pub is_active: bool,
}

/// First active reservation overlapping `candidate`.
///
/// `exclude` skips the room being edited so it does not conflict with its
/// own previous window.
pub fn find_conflict<'a, I>(
    candidate: &Interval,
    reservations: I,
    exclude: Option<Uuid>,
) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    reservations.into_iter().find(|r| {
        r.is_active && Some(r.room_id) != exclude && r.interval.overlaps(candidate)
    })
}

/// Opening hours of the availability grid, in whole UTC hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub open_hour: u32,
    pub close_hour: u32,
}

impl Default for SlotWindow {
    fn default() -> Self {
        Self {
            open_hour: DEFAULT_OPEN_HOUR,
            close_hour: DEFAULT_CLOSE_HOUR,
        }
    }
}

impl SlotWindow {
    pub fn new(open_hour: u32, close_hour: u32) -> BookingResult<Self> {
        if close_hour > 24 || open_hour >= close_hour {
            return Err(BookingError::Validation(format!(
                "Invalid opening hours {}-{}",
                open_hour, close_hour
            )));
        }
        Ok(Self {
            open_hour,
            close_hour,
        })
    }

    /// Overrides either bound, keeping this window's value for the other.
    pub fn with_overrides(self, open: Option<u32>, close: Option<u32>) -> BookingResult<Self> {
        Self::new(
            open.unwrap_or(self.open_hour),
            close.unwrap_or(self.close_hour),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    pub room_id: Option<Uuid>,
}

pub fn hourly_slots(day: NaiveDate, window: SlotWindow, reservations: &[Reservation]) -> Vec<HourSlot> {
    let midnight = Interval::day(day).start;

    (window.open_hour..window.close_hour)
        .map(|hour| {
            let start = midnight + Duration::hours(i64::from(hour));
            let slot = Interval {
                start,
                end: start + Duration::hours(1),
            };
            let conflict = find_conflict(&slot, reservations, None);
            HourSlot {
                start: slot.start,
                end: slot.end,
                available: conflict.is_none(),
                room_id: conflict.map(|r| r.room_id),
            }
        })
        .collect()
}
