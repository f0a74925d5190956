//! # Admin Handlers
//!
//! Dashboard endpoints for administrators: a calendar of every room, full
//! room and participant editing, and the aggregate statistics.
//!
//! Reactivating a room through [`update_room`] re-runs the court conflict
//! check, since a closed room releases its court window.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use courtside_core::{
    errors::BookingError,
    models::{
        participant::{AdminParticipantRecord, Participant, UpdateParticipantRequest},
        room::{AdminRoomQuery, AdminRoomRecord, AdminRoomUpdate, MessageResponse, Room, parse_day},
    },
    policy,
    statistics::{RoomSnapshot, Statistics, summarize},
    waitlist::allocate,
};
use courtside_db::repositories::{court, participant, room};
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::room::{ensure_court_available, find_room_by_id, participants_by_room, room_participants},
    middleware::{auth::AdminUser, error_handling::AppError},
};

fn active_count(participants: &[Participant]) -> usize {
    participants.iter().filter(|p| p.is_active).count()
}

async fn find_room_participant(
    state: &ApiState,
    room_id: Uuid,
    participant_id: Uuid,
) -> Result<Participant, AppError> {
    let row = participant::get_participant_by_id(&state.db_pool, participant_id)
        .await?
        .filter(|p| p.room_id == room_id)
        .ok_or_else(|| {
            BookingError::NotFound(format!(
                "Participant {} not found in room {}",
                participant_id, room_id
            ))
        })?;

    Ok(Participant::try_from(row)?)
}

fn participant_record(participants: &[Participant], capacity: usize, id: Uuid) -> Option<AdminParticipantRecord> {
    let allocation = allocate(participants, capacity);
    let is_waiting = allocation.status_of(id).is_some_and(|s| s.is_waiting());

    participants
        .iter()
        .find(|p| p.id == id)
        .map(|p| AdminParticipantRecord::new(p, is_waiting))
}

/// Every room, active or closed, optionally narrowed to a sport and a day.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_rooms(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Query(query): Query<AdminRoomQuery>,
) -> Result<Json<Vec<AdminRoomRecord>>, AppError> {
    let sport = query.sport.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let day = match query.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_day(raw)?),
        None => None,
    };

    let rooms: Vec<Room> = room::list_rooms(&state.db_pool, sport, day)
        .await?
        .into_iter()
        .map(Room::from)
        .collect();
    let grouped = participants_by_room(&state, &rooms).await?;

    let records = rooms
        .iter()
        .map(|room| {
            let participants = grouped.get(&room.id).map(Vec::as_slice).unwrap_or_default();
            AdminRoomRecord::new(room, active_count(participants))
        })
        .collect();

    Ok(Json(records))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_room(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminRoomUpdate>,
) -> Result<Json<AdminRoomRecord>, AppError> {
    let existing = find_room_by_id(&state, id).await?;
    let draft = payload.room.validate()?;
    let is_active = payload.is_active.unwrap_or(existing.is_active);

    let mut tx = state.db_pool.begin().await?;
    if is_active {
        ensure_court_available(&mut tx, &draft, Some(&existing)).await?;
    }
    let updated: Room = room::update_room(&mut *tx, id, &draft, is_active)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Room with ID {} not found", id)))?
        .into();
    let participants = room_participants(&mut *tx, id).await?;
    tx.commit().await?;

    info!("Admin {} updated room {} (active: {})", admin.user.username, id, is_active);

    Ok(Json(AdminRoomRecord::new(&updated, active_count(&participants))))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_room(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = find_room_by_id(&state, id).await?;

    room::delete_room(&state.db_pool, id).await?;

    info!("Admin {} deleted room {}", admin.user.username, id);

    Ok(Json(MessageResponse::new(format!(
        "Room \"{}\" was permanently deleted",
        existing.name
    ))))
}

/// All participants of a room in registration order, flagged when they sit
/// on the waiting list.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn room_participants_list(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AdminParticipantRecord>>, AppError> {
    let existing = find_room_by_id(&state, id).await?;
    let participants = room_participants(&state.db_pool, id).await?;
    let allocation = allocate(&participants, existing.capacity());

    let records = participants
        .iter()
        .map(|p| {
            let is_waiting = allocation.status_of(p.id).is_some_and(|s| s.is_waiting());
            AdminParticipantRecord::new(p, is_waiting)
        })
        .collect();

    Ok(Json(records))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_participant(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateParticipantRequest>,
) -> Result<Json<AdminParticipantRecord>, AppError> {
    let existing = find_room_by_id(&state, id).await?;
    let mut edited = find_room_participant(&state, id, participant_id).await?;
    let current = room_participants(&state.db_pool, id).await?;
    policy::ensure_can_reactivate(&edited, &payload, &current)?;

    edited.apply_update(&payload, Utc::now());
    participant::update_participant(&state.db_pool, &edited).await?;

    info!(
        "Admin {} updated participant {} in room {} (payment: {})",
        admin.user.username, participant_id, id, edited.payment_status
    );

    let participants = room_participants(&state.db_pool, id).await?;
    let record = participant_record(&participants, existing.capacity(), participant_id)
        .ok_or_else(|| BookingError::NotFound(format!("Participant {} not found", participant_id)))?;

    Ok(Json(record))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_participant(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, AppError> {
    let removed = find_room_participant(&state, id, participant_id).await?;

    participant::delete_participant(&state.db_pool, removed.id).await?;

    info!("Admin {} deleted participant {} from room {}", admin.user.username, participant_id, id);

    Ok(Json(MessageResponse::new(format!(
        "{} was deleted from the room",
        removed.user_name
    ))))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn statistics(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Statistics>, AppError> {
    let rooms: Vec<Room> = room::list_rooms(&state.db_pool, None, None)
        .await?
        .into_iter()
        .map(Room::from)
        .collect();
    let grouped = participants_by_room(&state, &rooms).await?;
    let prices: HashMap<Uuid, f64> = court::list_courts(&state.db_pool, true)
        .await?
        .into_iter()
        .map(|c| (c.id, c.hourly_price))
        .collect();

    let snapshots: Vec<RoomSnapshot<'_>> = rooms
        .iter()
        .map(|room| RoomSnapshot {
            room,
            participants: grouped.get(&room.id).map(Vec::as_slice).unwrap_or_default(),
            court_hourly_price: room.court_id.and_then(|id| prices.get(&id).copied()),
        })
        .collect();

    Ok(Json(summarize(&snapshots)))
}
