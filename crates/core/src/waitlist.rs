//! # Waiting List
//!
//! A room's seats are never stored. They are derived on every read from the
//! room's active participants ordered by registration time: the first
//! `max_participants` are confirmed, everyone after them waits.
//!
//! Because the split is recomputed, deactivating a confirmed participant
//! moves the earliest waiting participant into the confirmed block, and
//! reactivating someone puts them back at the position their original
//! registration time earns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything that holds a place in a room's registration queue.
pub trait Registration {
    fn registration_id(&self) -> Uuid;
    fn registered_at(&self) -> DateTime<Utc>;
    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeatStatus {
    Confirmed,
    /// `position` is 1-based within the waiting list.
    Waiting { position: usize },
}

impl SeatStatus {
    pub fn is_waiting(&self) -> bool {
        matches!(self, SeatStatus::Waiting { .. })
    }
}

/// Confirmed and waiting participants of one room, both in queue order.
#[derive(Debug)]
pub struct Allocation<'a, T> {
    pub confirmed: Vec<&'a T>,
    pub waiting: Vec<&'a T>,
}

impl<T: Registration> Allocation<'_, T> {
    pub fn confirmed_count(&self) -> usize {
        self.confirmed.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    /// Seat of the registration with `id`, or `None` if it is inactive or
    /// not part of this room.
    pub fn status_of(&self, id: Uuid) -> Option<SeatStatus> {
        if self.confirmed.iter().any(|r| r.registration_id() == id) {
            return Some(SeatStatus::Confirmed);
        }

        self.waiting
            .iter()
            .position(|r| r.registration_id() == id)
            .map(|index| SeatStatus::Waiting { position: index + 1 })
    }
}

/// Active registrations sorted by `(registered_at, id)`.
///
/// The id tie-break keeps the order total when two rows share a timestamp.
pub fn active_in_order<T: Registration>(items: &[T]) -> Vec<&T> {
    let mut active: Vec<&T> = items.iter().filter(|r| r.is_active()).collect();
    active.sort_by_key(|r| (r.registered_at(), r.registration_id()));
    active
}

pub fn allocate<T: Registration>(items: &[T], capacity: usize) -> Allocation<'_, T> {
    let mut confirmed = active_in_order(items);
    let waiting = if confirmed.len() > capacity {
        confirmed.split_off(capacity)
    } else {
        Vec::new()
    };

    Allocation { confirmed, waiting }
}

pub fn is_full<T: Registration>(items: &[T], capacity: usize) -> bool {
    items.iter().filter(|r| r.is_active()).count() >= capacity
}

pub fn seat_status<T: Registration>(items: &[T], capacity: usize, id: Uuid) -> Option<SeatStatus> {
    allocate(items, capacity).status_of(id)
}
