use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookingError;
use crate::models::room::{ParticipantView, non_empty};
use crate::waitlist::Registration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(BookingError::Validation(format!(
                "Unknown payment status '{}'",
                other
            ))),
        }
    }
}

/// A user's membership in a room, loaded together with the user's
/// display name and email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub registered_at: DateTime<Utc>,
    pub is_active: bool,
    pub checked_in: bool,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Registration for Participant {
    fn registration_id(&self) -> Uuid {
        self.id
    }

    fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Participant {
    pub fn view(&self) -> ParticipantView {
        ParticipantView {
            id: self.id,
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            registered_at: self.registered_at,
            checked_in: self.checked_in,
        }
    }

    /// Applies an admin edit. Fields left as `None` are unchanged.
    ///
    /// The payment date is stamped the first time the status becomes `paid`
    /// and kept afterwards.
    pub fn apply_update(&mut self, update: &UpdateParticipantRequest, now: DateTime<Utc>) {
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(checked_in) = update.checked_in {
            self.checked_in = checked_in;
        }
        if let Some(status) = update.payment_status {
            self.payment_status = status;
            if status == PaymentStatus::Paid && self.payment_date.is_none() {
                self.payment_date = Some(now);
            }
        }
        if let Some(method) = &update.payment_method {
            self.payment_method = non_empty(Some(method));
        }
        if let Some(notes) = &update.notes {
            self.notes = non_empty(Some(notes));
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateParticipantRequest {
    pub is_active: Option<bool>,
    pub checked_in: Option<bool>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminParticipantRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub registered_at: DateTime<Utc>,
    pub is_active: bool,
    pub checked_in: bool,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub is_in_waiting_list: bool,
}

impl AdminParticipantRecord {
    pub fn new(participant: &Participant, is_in_waiting_list: bool) -> Self {
        Self {
            id: participant.id,
            user_id: participant.user_id,
            user_name: participant.user_name.clone(),
            user_email: participant.user_email.clone(),
            registered_at: participant.registered_at,
            is_active: participant.is_active,
            checked_in: participant.checked_in,
            payment_status: participant.payment_status,
            payment_date: participant.payment_date,
            payment_method: participant.payment_method.clone(),
            notes: participant.notes.clone(),
            is_in_waiting_list,
        }
    }
}
