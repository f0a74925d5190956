//! # Room Handlers
//!
//! Public room endpoints: listing, creation, the detail view with its
//! confirmed and waiting lists, and the join / leave / close lifecycle.
//!
//! Seats are never stored. Every response that shows them recomputes the
//! split from the room's participants, so a departure immediately promotes
//! the first person on the waiting list.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use courtside_core::{
    availability::{Reservation, find_conflict},
    errors::BookingError,
    models::{
        court::Court,
        participant::Participant,
        room::{
            JoinRoomResponse, MessageResponse, Room, RoomDetailResponse, RoomDraft, RoomListResponse,
            RoomQuery, RoomRequest, RoomSummary,
        },
    },
    policy::{self, Actor},
    pricing::{Tariff, quote},
    waitlist::{SeatStatus, allocate},
};
use courtside_db::{
    models::into_participants,
    repositories::{court, participant, room},
};
use sqlx::{Executor, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{CurrentUser, OptionalUser},
        error_handling::AppError,
    },
};

pub(crate) async fn find_room_by_link_code(state: &ApiState, link_code: &str) -> Result<Room, AppError> {
    room::get_room_by_link_code(&state.db_pool, link_code)
        .await?
        .map(Room::from)
        .ok_or_else(|| AppError(BookingError::NotFound(format!("Room {} not found", link_code))))
}

pub(crate) async fn find_room_by_id(state: &ApiState, id: Uuid) -> Result<Room, AppError> {
    room::get_room_by_id(&state.db_pool, id)
        .await?
        .map(Room::from)
        .ok_or_else(|| AppError(BookingError::NotFound(format!("Room with ID {} not found", id))))
}

pub(crate) async fn room_participants<'e, E>(executor: E, room_id: Uuid) -> Result<Vec<Participant>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = participant::get_participants_by_room(executor, room_id).await?;
    Ok(into_participants(rows)?)
}

/// Participants of several rooms, grouped by room id.
pub(crate) async fn participants_by_room(
    state: &ApiState,
    rooms: &[Room],
) -> Result<HashMap<Uuid, Vec<Participant>>, AppError> {
    let ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
    let rows = participant::get_participants_for_rooms(&state.db_pool, &ids).await?;

    let mut grouped: HashMap<Uuid, Vec<Participant>> = HashMap::new();
    for participant in into_participants(rows)? {
        grouped.entry(participant.room_id).or_default().push(participant);
    }

    Ok(grouped)
}

pub(crate) async fn summarize_rooms(state: &ApiState, rooms: &[Room]) -> Result<Vec<RoomSummary>, AppError> {
    let grouped = participants_by_room(state, rooms).await?;

    Ok(rooms
        .iter()
        .map(|room| {
            let participants = grouped.get(&room.id).map(Vec::as_slice).unwrap_or_default();
            let allocation = allocate(participants, room.capacity());
            RoomSummary::new(room, allocation.confirmed_count(), allocation.waiting_count())
        })
        .collect())
}

/// Checks that the draft's court exists, can host it, and is free for the
/// draft's window. `existing` is the stored room when editing one.
pub(crate) async fn ensure_court_available(
    tx: &mut Transaction<'_, Postgres>,
    draft: &RoomDraft,
    existing: Option<&Room>,
) -> Result<(), AppError> {
    let Some(court_id) = draft.court_id else {
        return Ok(());
    };

    let court = court::get_court_by_id(&mut **tx, court_id)
        .await?
        .map(Court::from)
        .ok_or_else(|| BookingError::NotFound(format!("Court with ID {} not found", court_id)))?;

    policy::ensure_court_bookable(&court, draft, existing)?;

    let candidate = draft.interval();
    let reservations: Vec<Reservation> = room::get_court_reservations(&mut **tx, court_id, Some(candidate))
        .await?
        .into_iter()
        .map(|row| Room::from(row).reservation())
        .collect();

    if let Some(conflict) = find_conflict(&candidate, &reservations, existing.map(|r| r.id)) {
        tracing::warn!(
            "Court {} already reserved by room {} for {} - {}",
            court_id, conflict.room_id, conflict.interval.start, conflict.interval.end
        );
        return Err(BookingError::Conflict(format!(
            "Court '{}' is already booked from {} to {}",
            court.name,
            conflict.interval.start.format("%Y-%m-%d %H:%M"),
            conflict.interval.end.format("%Y-%m-%d %H:%M"),
        ))
        .into());
    }

    Ok(())
}

async fn court_hourly_price(state: &ApiState, room: &Room) -> Result<Option<f64>, AppError> {
    let Some(court_id) = room.court_id else {
        return Ok(None);
    };

    let court = court::get_court_by_id(&state.db_pool, court_id).await?;
    Ok(court.map(|c| c.hourly_price))
}

async fn room_detail(
    state: &ApiState,
    room: Room,
    actor: Option<&Actor>,
) -> Result<RoomDetailResponse, AppError> {
    let participants = room_participants(&state.db_pool, room.id).await?;
    policy::ensure_can_view(&room, actor, &participants)?;

    let allocation = allocate(&participants, room.capacity());
    let own = actor.and_then(|a| policy::active_participation(&participants, a.user_id));
    let price = quote(
        Tariff::for_room(court_hourly_price(state, &room).await?, room.price_per_person),
        room.duration_hours,
        allocation.confirmed_count(),
    );

    Ok(RoomDetailResponse {
        room: RoomSummary::new(&room, allocation.confirmed_count(), allocation.waiting_count()),
        description: room.description.clone(),
        creator_id: room.creator_id,
        is_owner: policy::is_owner(&room, actor),
        is_participating: own.is_some(),
        my_seat: own.and_then(|p| allocation.status_of(p.id)),
        confirmed: allocation.confirmed.iter().map(|p| p.view()).collect(),
        waiting: allocation.waiting.iter().map(|p| p.view()).collect(),
        price,
    })
}

/// Active rooms the caller may see, split around the current instant.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_rooms(
    State(state): State<Arc<ApiState>>,
    viewer: OptionalUser,
    Query(query): Query<RoomQuery>,
) -> Result<Json<RoomListResponse>, AppError> {
    let sport = query.sport.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let city = query.city.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let filter = room::RoomFilter {
        sport,
        city,
        viewer_id: viewer.actor().map(|a| a.user_id),
    };

    let rooms: Vec<Room> = room::list_active_rooms(&state.db_pool, &filter)
        .await?
        .into_iter()
        .map(Room::from)
        .collect();

    let now = Utc::now();
    let (upcoming, past): (Vec<_>, Vec<_>) = summarize_rooms(&state, &rooms)
        .await?
        .into_iter()
        .partition(|summary| summary.date > now);

    Ok(Json(RoomListResponse { upcoming, past }))
}

/// Creates a room and registers its organizer as the first participant.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_room(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Json(payload): Json<RoomRequest>,
) -> Result<(StatusCode, Json<RoomDetailResponse>), AppError> {
    let draft = payload.validate()?;
    let actor = current.actor();

    let mut tx = state.db_pool.begin().await?;
    ensure_court_available(&mut tx, &draft, None).await?;
    let row = room::create_room(&mut *tx, actor.user_id, &draft).await?;
    participant::add_participant(&mut *tx, row.id, actor.user_id).await?;
    tx.commit().await?;

    info!("Room {} ({}) created by {}", row.link_code, row.id, current.user.username);

    let detail = room_detail(&state, row.into(), Some(&actor)).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_room(
    State(state): State<Arc<ApiState>>,
    viewer: OptionalUser,
    Path(link_code): Path<String>,
) -> Result<Json<RoomDetailResponse>, AppError> {
    let room = find_room_by_link_code(&state, &link_code).await?;
    let actor = viewer.actor();

    Ok(Json(room_detail(&state, room, actor.as_ref()).await?))
}

/// Edits a room. A court-bound active room must still fit its court's
/// schedule, ignoring its own previous window.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_room(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(link_code): Path<String>,
    Json(payload): Json<RoomRequest>,
) -> Result<Json<RoomDetailResponse>, AppError> {
    let room = find_room_by_link_code(&state, &link_code).await?;
    let actor = current.actor();
    policy::ensure_can_manage(&room, &actor)?;

    let draft = payload.validate()?;

    let mut tx = state.db_pool.begin().await?;
    if room.is_active {
        ensure_court_available(&mut tx, &draft, Some(&room)).await?;
    }
    let updated = room::update_room(&mut *tx, room.id, &draft, room.is_active)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Room {} not found", link_code)))?;
    tx.commit().await?;

    info!("Room {} updated by {}", link_code, current.user.username);

    Ok(Json(room_detail(&state, updated.into(), Some(&actor)).await?))
}

/// Appends the caller to the room's queue and reports the resulting seat.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn join_room(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(link_code): Path<String>,
) -> Result<(StatusCode, Json<JoinRoomResponse>), AppError> {
    let room = find_room_by_link_code(&state, &link_code).await?;
    let actor = current.actor();

    let mut tx = state.db_pool.begin().await?;
    let mut participants = room_participants(&mut *tx, room.id).await?;
    policy::ensure_can_join(&room, &actor, &participants)?;

    let row = participant::add_participant(&mut *tx, room.id, actor.user_id).await?;
    let joined = Participant::try_from(row)?;
    let participant_id = joined.id;
    participants.push(joined);
    tx.commit().await?;

    let seat = allocate(&participants, room.capacity())
        .status_of(participant_id)
        .ok_or_else(|| BookingError::Internal("new participant missing from allocation".into()))?;

    let message = match seat {
        SeatStatus::Confirmed => "You have been added to the participant list".to_string(),
        SeatStatus::Waiting { position } => {
            format!("The room is full. You are number {} on the waiting list", position)
        }
    };

    info!("User {} joined room {} ({:?})", current.user.username, link_code, seat);

    Ok((
        StatusCode::CREATED,
        Json(JoinRoomResponse {
            participant_id,
            seat,
            message,
        }),
    ))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn leave_room(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(link_code): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let room = find_room_by_link_code(&state, &link_code).await?;
    let participants = room_participants(&state.db_pool, room.id).await?;
    let leaving = policy::leaving_participation(&room, &current.actor(), &participants)?;

    participant::set_participant_active(&state.db_pool, leaving.id, false).await?;

    info!("User {} left room {}", current.user.username, link_code);

    Ok(Json(MessageResponse::new("You have left the room")))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn close_room(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(link_code): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let room = find_room_by_link_code(&state, &link_code).await?;
    policy::ensure_can_manage(&room, &current.actor())?;

    room::set_room_active(&state.db_pool, room.id, false).await?;

    info!("Room {} closed by {}", link_code, current.user.username);

    Ok(Json(MessageResponse::new("Room closed")))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_room(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(link_code): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let room = find_room_by_link_code(&state, &link_code).await?;
    policy::ensure_can_manage(&room, &current.actor())?;

    room::delete_room(&state.db_pool, room.id).await?;

    info!("Room {} deleted by {}", link_code, current.user.username);

    Ok(Json(MessageResponse::new(format!(
        "Room \"{}\" was permanently deleted",
        room.name
    ))))
}

/// Soft-deletes a participant. The organizer cannot be removed.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn remove_participant(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path((link_code, participant_id)): Path<(String, Uuid)>,
) -> Result<Json<MessageResponse>, AppError> {
    let room = find_room_by_link_code(&state, &link_code).await?;
    policy::ensure_can_manage(&room, &current.actor())?;

    let row = participant::get_participant_by_id(&state.db_pool, participant_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Participant {} not found", participant_id)))?;
    let removed = Participant::try_from(row)?;
    policy::ensure_can_remove(&room, &removed)?;

    participant::set_participant_active(&state.db_pool, removed.id, false).await?;

    info!("Participant {} removed from room {}", participant_id, link_code);

    Ok(Json(MessageResponse::new(format!(
        "{} was removed from the room",
        removed.user_name
    ))))
}
