//! # Courtside Core
//!
//! Domain types and the booking rules shared by the database and API crates.
//!
//! The interesting parts live in three small modules:
//!
//! - [`waitlist`]: splits a room's active participants into confirmed and waiting
//! - [`availability`]: half-open interval overlap checks against court reservations
//! - [`pricing`]: per-person price from court cost and confirmed head count
//!
//! Nothing in this crate touches the database; every function works on plain values.

pub mod availability;
pub mod errors;
pub mod models;
pub mod policy;
pub mod pricing;
pub mod statistics;
pub mod waitlist;
