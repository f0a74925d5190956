use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::room::RoomSummary;
use crate::waitlist::SeatStatus;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Checks field lengths, email shape and password confirmation.
    ///
    /// Uniqueness of username and email is enforced by the database layer.
    pub fn validate(&self) -> BookingResult<()> {
        let username = self.username.trim();
        if !(3..=50).contains(&username.chars().count()) {
            return Err(BookingError::Validation(
                "Username must be between 3 and 50 characters".to_string(),
            ));
        }

        if !(3..=100).contains(&self.name.trim().chars().count()) {
            return Err(BookingError::Validation(
                "Name must be between 3 and 100 characters".to_string(),
            ));
        }

        if !is_plausible_email(self.email.trim()) {
            return Err(BookingError::Validation("Invalid email address".to_string()));
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BookingError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.password != self.confirm_password {
            return Err(BookingError::Validation("Passwords must match".to_string()));
        }

        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationSummary {
    pub room: RoomSummary,
    pub registered_at: DateTime<Utc>,
    pub seat: Option<SeatStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub rooms_created: Vec<RoomSummary>,
    pub participations: Vec<ParticipationSummary>,
}
