use chrono::{DateTime, Utc};
use courtside_core::models::{
    court::Court,
    participant::{Participant, PaymentStatus},
    room::Room,
    user::User,
};
use eyre::{Report, WrapErr};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCourt {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRoom {
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

/// A participant row joined with the user's name and email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbParticipant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub registered_at: DateTime<Utc>,
    pub is_active: bool,
    pub checked_in: bool,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl From<DbCourt> for Court {
    fn from(row: DbCourt) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sport_type: row.sport_type,
            location: row.location,
            city: row.city,
            description: row.description,
            hourly_price: row.hourly_price,
            capacity: row.capacity,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl From<DbRoom> for Room {
    fn from(row: DbRoom) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sport: row.sport,
            date: row.date,
            duration_hours: row.duration_hours,
            max_participants: row.max_participants,
            description: row.description,
            city: row.city,
            location: row.location,
            link_code: row.link_code,
            is_private: row.is_private,
            is_active: row.is_active,
            creator_id: row.creator_id,
            court_id: row.court_id,
            price_per_person: row.price_per_person,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbParticipant> for Participant {
    type Error = Report;

    fn try_from(row: DbParticipant) -> Result<Self, Self::Error> {
        let payment_status = row
            .payment_status
            .parse::<PaymentStatus>()
            .wrap_err_with(|| format!("Participant {} has a corrupt payment status", row.id))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            room_id: row.room_id,
            user_name: row.user_name,
            user_email: row.user_email,
            registered_at: row.registered_at,
            is_active: row.is_active,
            checked_in: row.checked_in,
            payment_status,
            payment_method: row.payment_method,
            payment_date: row.payment_date,
            notes: row.notes,
        })
    }
}

/// Converts a batch of participant rows, failing on the first corrupt one.
pub fn into_participants(rows: Vec<DbParticipant>) -> eyre::Result<Vec<Participant>> {
    rows.into_iter().map(Participant::try_from).collect()
}
