//! # Account Handlers
//!
//! Registration, login with bearer sessions, logout and the profile page.

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode};
use chrono::{Duration, Utc};
use courtside_core::{
    errors::BookingError,
    models::{
        room::{MessageResponse, Room, RoomSummary},
        user::{LoginRequest, LoginResponse, ParticipationSummary, ProfileResponse, RegisterRequest, User, UserResponse},
    },
    waitlist::allocate,
};
use courtside_db::{
    models::into_participants,
    repositories::{participant, room, session, user},
};
use tracing::{debug, info};

use crate::{
    ApiState,
    handlers::room::{participants_by_room, summarize_rooms},
    middleware::{
        auth::{self, CurrentUser},
        error_handling::AppError,
    },
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let username = payload.username.trim();
    let email = payload.email.trim();

    if user::get_user_by_username(&state.db_pool, username).await?.is_some() {
        return Err(BookingError::Conflict(format!("Username '{}' is already taken", username)).into());
    }
    if user::get_user_by_email(&state.db_pool, email).await?.is_some() {
        return Err(BookingError::Conflict(format!("Email '{}' is already registered", email)).into());
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let created: User = user::create_user(
        &state.db_pool,
        username,
        email,
        payload.name.trim(),
        &password_hash,
        false,
    )
    .await?
    .into();

    info!("Registered user {} ({})", created.username, created.id);

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Exchanges credentials for a session token valid for the configured TTL.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let now = Utc::now();

    let account: User = user::verify_credentials(&state.db_pool, payload.username.trim(), &payload.password)
        .await?
        .ok_or_else(|| BookingError::Authentication("Invalid username or password".to_string()))?
        .into();

    let purged = session::delete_expired_sessions(&state.db_pool, now).await?;
    if purged > 0 {
        debug!("Purged {} expired sessions", purged);
    }

    let token = auth::generate_session_token();
    let expires_at = now + Duration::hours(state.session_ttl_hours);
    session::create_session(&state.db_pool, &token, account.id, expires_at).await?;

    info!("User {} logged in", account.username);

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: account.into(),
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<MessageResponse>, AppError> {
    session::delete_session(&state.db_pool, &current.token).await?;

    info!("User {} logged out", current.user.username);

    Ok(Json(MessageResponse::new("Logged out")))
}

/// The caller's account, the rooms they organize and the rooms they are
/// registered in, each with their current seat.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn profile(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = current.user.id;

    let created: Vec<Room> = room::list_rooms_by_creator(&state.db_pool, user_id)
        .await?
        .into_iter()
        .map(Room::from)
        .collect();
    let rooms_created = summarize_rooms(&state, &created).await?;

    let mine = into_participants(participant::get_active_participations_by_user(&state.db_pool, user_id).await?)?;
    let room_ids: Vec<_> = mine.iter().map(|p| p.room_id).collect();
    let joined: Vec<Room> = room::list_rooms_by_ids(&state.db_pool, &room_ids)
        .await?
        .into_iter()
        .map(Room::from)
        .collect();
    let grouped = participants_by_room(&state, &joined).await?;
    let rooms: HashMap<_, _> = joined.iter().map(|r| (r.id, r)).collect();

    let participations = mine
        .iter()
        .filter_map(|p| {
            let room = rooms.get(&p.room_id)?;
            let everyone = grouped.get(&room.id).map(Vec::as_slice).unwrap_or_default();
            let allocation = allocate(everyone, room.capacity());
            Some(ParticipationSummary {
                room: RoomSummary::new(room, allocation.confirmed_count(), allocation.waiting_count()),
                registered_at: p.registered_at,
                seat: allocation.status_of(p.id),
            })
        })
        .collect();

    Ok(Json(ProfileResponse {
        user: current.user.into(),
        rooms_created,
        participations,
    }))
}
