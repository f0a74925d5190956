use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::participant::{Participant, PaymentStatus};
use crate::models::room::Room;
use crate::pricing::{Tariff, quote, round_cents};
use crate::waitlist::allocate;

/// One room with everything needed to price and count it.
#[derive(Debug, Clone, Copy)]
pub struct RoomSnapshot<'a> {
    pub room: &'a Room,
    pub participants: &'a [Participant],
    pub court_hourly_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_rooms: usize,
    pub active_rooms: usize,
    pub private_rooms: usize,
    pub active_participants: usize,
    pub confirmed_participants: usize,
    pub waiting_participants: usize,
    pub checked_in: usize,
    pub paid: usize,
    pub pending_payments: usize,
    pub expected_revenue: f64,
    pub collected_revenue: f64,
    pub rooms_by_sport: BTreeMap<String, usize>,
}

/// Aggregates the admin dashboard numbers.
///
/// Participant and revenue figures only count active rooms; closed rooms
/// still show up in the room totals and the per-sport breakdown.
pub fn summarize(snapshots: &[RoomSnapshot<'_>]) -> Statistics {
    let mut stats = Statistics::default();

    for snapshot in snapshots {
        let room = snapshot.room;
        stats.total_rooms += 1;
        if room.is_private {
            stats.private_rooms += 1;
        }
        *stats.rooms_by_sport.entry(room.sport.clone()).or_default() += 1;

        if !room.is_active {
            continue;
        }
        stats.active_rooms += 1;

        let allocation = allocate(snapshot.participants, room.capacity());
        let price = quote(
            Tariff::for_room(snapshot.court_hourly_price, room.price_per_person),
            room.duration_hours,
            allocation.confirmed_count(),
        );

        stats.active_participants += allocation.confirmed_count() + allocation.waiting_count();
        stats.confirmed_participants += allocation.confirmed_count();
        stats.waiting_participants += allocation.waiting_count();
        stats.checked_in += allocation.confirmed.iter().filter(|p| p.checked_in).count();

        let paid = allocation
            .confirmed
            .iter()
            .filter(|p| p.payment_status == PaymentStatus::Paid)
            .count();
        stats.paid += paid;
        stats.pending_payments += allocation
            .confirmed
            .iter()
            .filter(|p| p.payment_status == PaymentStatus::Pending)
            .count();

        stats.expected_revenue += price.total;
        stats.collected_revenue += price.per_person * paid as f64;
    }

    stats.expected_revenue = round_cents(stats.expected_revenue);
    stats.collected_revenue = round_cents(stats.collected_revenue);
    stats
}
