use chrono::{Duration, Utc};
use courtside_api::middleware::error_handling::AppError;
use courtside_core::{
    errors::BookingError,
    models::{
        participant::{AdminParticipantRecord, Participant, PaymentStatus, UpdateParticipantRequest},
        room::{AdminRoomRecord, Room},
    },
    policy::ensure_can_reactivate,
    statistics::{RoomSnapshot, summarize},
    waitlist::allocate,
};
use courtside_db::models::into_participants;
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{TestContext, db_court, db_participant, db_room};

// Mirrors the admin participant listing over mocked repositories
async fn test_participants_wrapper(
    ctx: &TestContext,
    room_id: Uuid,
) -> Result<Vec<AdminParticipantRecord>, AppError> {
    let room: Room = ctx
        .room_repo
        .get_room_by_id(room_id)
        .await?
        .map(Room::from)
        .ok_or_else(|| BookingError::NotFound(format!("Room with ID {} not found", room_id)))?;
    let participants = into_participants(ctx.participant_repo.get_participants_by_room(room_id).await?)?;
    let allocation = allocate(&participants, room.capacity());

    Ok(participants
        .iter()
        .map(|p| AdminParticipantRecord::new(p, allocation.status_of(p.id).is_some_and(|s| s.is_waiting())))
        .collect())
}

#[tokio::test]
async fn test_participant_listing_flags_waiting_list() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(1), 2);
    let room_id = room.id;
    let mut dropped = db_participant(&room, 1);
    dropped.is_active = false;
    let rows = vec![
        db_participant(&room, 0),
        dropped,
        db_participant(&room, 2),
        db_participant(&room, 3),
    ];

    ctx.room_repo
        .expect_get_room_by_id()
        .with(predicate::eq(room_id))
        .returning(move |_| Ok(Some(room.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .with(predicate::eq(room_id))
        .returning(move |_| Ok(rows.clone()));

    let records = test_participants_wrapper(&ctx, room_id).await.unwrap();

    assert_eq!(
        records.iter().map(|r| (r.is_active, r.is_in_waiting_list)).collect::<Vec<_>>(),
        vec![(true, false), (false, false), (true, false), (true, true)]
    );
}

#[tokio::test]
async fn test_participant_listing_for_missing_room() {
    let mut ctx = TestContext::new();
    ctx.room_repo.expect_get_room_by_id().returning(|_| Ok(None));
    ctx.participant_repo.expect_get_participants_by_room().times(0);

    let err = test_participants_wrapper(&ctx, Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err.0, BookingError::NotFound(_)));
}

#[tokio::test]
async fn test_payment_update_stamps_date_once() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(1), 10);
    let row = db_participant(&room, 0);
    let participant_id = row.id;

    ctx.participant_repo
        .expect_get_participant_by_id()
        .with(predicate::eq(participant_id))
        .returning(move |_| Ok(Some(row.clone())));

    let fetched = ctx.participant_repo.get_participant_by_id(participant_id).await.unwrap().unwrap();
    let mut participant = Participant::try_from(fetched).unwrap();

    let paid_at = Utc::now();
    participant.apply_update(
        &UpdateParticipantRequest {
            payment_status: Some(PaymentStatus::Paid),
            payment_method: Some("pix".to_string()),
            checked_in: Some(true),
            ..Default::default()
        },
        paid_at,
    );
    participant.apply_update(
        &UpdateParticipantRequest {
            payment_status: Some(PaymentStatus::Paid),
            notes: Some("paid at the door".to_string()),
            ..Default::default()
        },
        paid_at + Duration::hours(1),
    );

    assert_eq!(participant.payment_status, PaymentStatus::Paid);
    assert_eq!(participant.payment_date, Some(paid_at));
    assert_eq!(participant.payment_method.as_deref(), Some("pix"));
    assert_eq!(participant.notes.as_deref(), Some("paid at the door"));
    assert!(participant.checked_in);
}

#[tokio::test]
async fn test_admin_calendar_and_statistics() {
    let mut ctx = TestContext::new();
    let court = db_court(120.0, 12);
    let court_id = court.id;

    let mut court_room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(1), 2);
    court_room.court_id = Some(court_id);
    let mut paid = db_participant(&court_room, 0);
    paid.payment_status = "paid".to_string();
    let court_rows = vec![paid, db_participant(&court_room, 1), db_participant(&court_room, 2)];

    let mut flat_room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(2), 10);
    flat_room.sport = "Vôlei".to_string();
    flat_room.is_active = false;

    let rooms = vec![court_room.clone(), flat_room];
    ctx.room_repo
        .expect_list_rooms()
        .times(1)
        .returning(move |_, _| Ok(rooms.clone()));
    ctx.court_repo
        .expect_list_courts()
        .with(predicate::eq(true))
        .returning(move |_| Ok(vec![court.clone()]));

    let rooms: Vec<Room> = ctx
        .room_repo
        .list_rooms(None, None)
        .await
        .unwrap()
        .into_iter()
        .map(Room::from)
        .collect();
    let courts = ctx.court_repo.list_courts(true).await.unwrap();
    let court_participants = into_participants(court_rows).unwrap();

    let calendar: Vec<AdminRoomRecord> = rooms
        .iter()
        .map(|room| {
            let active = if room.id == court_room.id { court_participants.len() } else { 0 };
            AdminRoomRecord::new(room, active)
        })
        .collect();
    assert_eq!(calendar[0].title, "Thursday Futsal - Futsal");
    assert_eq!(calendar[0].current_participants, 3);
    assert_eq!(calendar[0].end, court_room.date + Duration::hours(2));

    let snapshots = vec![
        RoomSnapshot {
            room: &rooms[0],
            participants: &court_participants,
            court_hourly_price: courts.iter().find(|c| Some(c.id) == rooms[0].court_id).map(|c| c.hourly_price),
        },
        RoomSnapshot {
            room: &rooms[1],
            participants: &[],
            court_hourly_price: None,
        },
    ];
    let stats = summarize(&snapshots);

    assert_eq!(stats.total_rooms, 2);
    assert_eq!(stats.active_rooms, 1);
    assert_eq!(stats.confirmed_participants, 2);
    assert_eq!(stats.waiting_participants, 1);
    assert_eq!(stats.paid, 1);
    assert_eq!(stats.pending_payments, 1);
    assert_eq!(stats.expected_revenue, 240.0);
    assert_eq!(stats.collected_revenue, 120.0);
    assert_eq!(stats.rooms_by_sport.get("Vôlei"), Some(&1));
}

// Mirrors the admin participant edit over mocked repositories
async fn test_update_participant_wrapper(
    ctx: &TestContext,
    room_id: Uuid,
    participant_id: Uuid,
    update: UpdateParticipantRequest,
) -> Result<Participant, AppError> {
    let row = ctx
        .participant_repo
        .get_participant_by_id(participant_id)
        .await?
        .filter(|p| p.room_id == room_id)
        .ok_or_else(|| BookingError::NotFound(format!("Participant {} not found", participant_id)))?;
    let mut edited = Participant::try_from(row)?;
    let current = into_participants(ctx.participant_repo.get_participants_by_room(room_id).await?)?;
    ensure_can_reactivate(&edited, &update, &current)?;

    edited.apply_update(&update, Utc::now());
    ctx.participant_repo.update_participant(edited.clone()).await?;

    Ok(edited)
}

#[tokio::test]
async fn test_reactivating_old_registration_keeps_one_seat() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(1), 2);
    let room_id = room.id;

    let organizer = db_participant(&room, 0);
    let mut left = db_participant(&room, 1);
    left.is_active = false;
    let mut rejoined = db_participant(&room, 2);
    rejoined.user_id = left.user_id;
    let waiting = db_participant(&room, 3);
    let left_id = left.id;

    let rows = vec![organizer, left.clone(), rejoined, waiting];
    ctx.participant_repo
        .expect_get_participant_by_id()
        .with(predicate::eq(left_id))
        .returning(move |_| Ok(Some(left.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .with(predicate::eq(room_id))
        .returning(move |_| Ok(rows.clone()));
    ctx.participant_repo.expect_update_participant().times(0);

    let err = test_update_participant_wrapper(
        &ctx,
        room_id,
        left_id,
        UpdateParticipantRequest {
            is_active: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err.0, BookingError::Validation(ref m) if m.contains("already holds")));
}

#[tokio::test]
async fn test_reactivating_sole_registration() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(1), 2);
    let room_id = room.id;

    let mut left = db_participant(&room, 1);
    left.is_active = false;
    let left_id = left.id;
    let rows = vec![db_participant(&room, 0), left.clone()];

    ctx.participant_repo
        .expect_get_participant_by_id()
        .returning(move |_| Ok(Some(left.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .returning(move |_| Ok(rows.clone()));
    ctx.participant_repo
        .expect_update_participant()
        .withf(move |p| p.id == left_id && p.is_active)
        .times(1)
        .returning(|_| Ok(true));

    let restored = test_update_participant_wrapper(
        &ctx,
        room_id,
        left_id,
        UpdateParticipantRequest {
            is_active: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(restored.is_active);
}
