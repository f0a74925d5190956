use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};
use courtside_api::middleware::error_handling::AppError;
use courtside_core::{
    availability::{Reservation, find_conflict},
    errors::BookingError,
    models::{
        court::Court,
        participant::Participant,
        room::{Room, RoomDraft},
    },
    policy::{self, Actor},
    waitlist::{SeatStatus, allocate},
};
use courtside_db::models::{DbParticipant, into_participants};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{TestContext, db_court, db_participant, db_room};

fn member(user_id: Uuid) -> Actor {
    Actor {
        user_id,
        is_admin: false,
    }
}

// Mirrors the join handler over mocked repositories
async fn test_join_wrapper(
    ctx: &TestContext,
    link_code: &'static str,
    actor: Actor,
) -> Result<SeatStatus, AppError> {
    let room: Room = ctx
        .room_repo
        .get_room_by_link_code(link_code)
        .await?
        .map(Room::from)
        .ok_or_else(|| BookingError::NotFound(format!("Room {} not found", link_code)))?;

    let mut participants = into_participants(ctx.participant_repo.get_participants_by_room(room.id).await?)?;
    policy::ensure_can_join(&room, &actor, &participants)?;

    let joined = Participant::try_from(ctx.participant_repo.add_participant(room.id, actor.user_id).await?)?;
    let joined_id = joined.id;
    participants.push(joined);

    allocate(&participants, room.capacity())
        .status_of(joined_id)
        .ok_or_else(|| AppError(BookingError::Internal("missing seat".into())))
}

// Mirrors the court availability check run before writing a room
async fn test_court_check_wrapper(
    ctx: &TestContext,
    draft: &RoomDraft,
    existing: Option<&Room>,
) -> Result<(), AppError> {
    let Some(court_id) = draft.court_id else {
        return Ok(());
    };

    let court: Court = ctx
        .court_repo
        .get_court_by_id(court_id)
        .await?
        .map(Court::from)
        .ok_or_else(|| BookingError::NotFound(format!("Court with ID {} not found", court_id)))?;
    policy::ensure_court_bookable(&court, draft, existing)?;

    let reservations: Vec<Reservation> = ctx
        .room_repo
        .get_court_reservations(court_id)
        .await?
        .into_iter()
        .map(|row| Room::from(row).reservation())
        .collect();

    match find_conflict(&draft.interval(), &reservations, existing.map(|r| r.id)) {
        Some(conflict) => Err(BookingError::Conflict(format!("Court booked by {}", conflict.room_id)).into()),
        None => Ok(()),
    }
}

fn draft_for(court_id: Uuid, start_hour: u32, duration_hours: i32) -> RoomDraft {
    RoomDraft {
        name: "Night game".to_string(),
        sport: "Futsal".to_string(),
        date: Utc.with_ymd_and_hms(2030, 3, 14, start_hour, 0, 0).unwrap(),
        duration_hours,
        max_participants: 10,
        city: "Recife".to_string(),
        location: None,
        description: None,
        is_private: false,
        court_id: Some(court_id),
        price_per_person: 0.0,
    }
}

fn new_row(room_id: Uuid, user_id: Uuid) -> DbParticipant {
    DbParticipant {
        id: Uuid::new_v4(),
        user_id,
        room_id,
        user_name: "Late Joiner".to_string(),
        user_email: "late@example.com".to_string(),
        registered_at: Utc::now(),
        is_active: true,
        checked_in: false,
        payment_status: "pending".to_string(),
        payment_method: None,
        payment_date: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_join_open_room_confirms_seat() {
    let mut ctx = TestContext::new();
    let creator = Uuid::new_v4();
    let joiner = Uuid::new_v4();
    let room = db_room(creator, Utc::now() + Duration::days(2), 4);
    let organizer = db_participant(&room, 0);
    let room_id = room.id;

    let found = room.clone();
    ctx.room_repo
        .expect_get_room_by_link_code()
        .with(predicate::eq("Fut5alXY"))
        .returning(move |_| Ok(Some(found.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .with(predicate::eq(room_id))
        .returning(move |_| Ok(vec![organizer.clone()]));
    ctx.participant_repo
        .expect_add_participant()
        .with(predicate::eq(room_id), predicate::eq(joiner))
        .times(1)
        .returning(|room_id, user_id| Ok(new_row(room_id, user_id)));

    let seat = test_join_wrapper(&ctx, "Fut5alXY", member(joiner)).await.unwrap();

    assert_eq!(seat, SeatStatus::Confirmed);
}

#[tokio::test]
async fn test_join_full_room_lands_on_waiting_list() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(2), 2);
    let existing = vec![db_participant(&room, 0), db_participant(&room, 5), db_participant(&room, 9)];

    let found = room.clone();
    ctx.room_repo
        .expect_get_room_by_link_code()
        .returning(move |_| Ok(Some(found.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .returning(move |_| Ok(existing.clone()));
    ctx.participant_repo
        .expect_add_participant()
        .times(1)
        .returning(|room_id, user_id| Ok(new_row(room_id, user_id)));

    let seat = test_join_wrapper(&ctx, "Fut5alXY", member(Uuid::new_v4())).await.unwrap();

    assert_eq!(seat, SeatStatus::Waiting { position: 2 });
}

#[tokio::test]
async fn test_join_twice_is_rejected_without_writing() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(2), 10);
    let mine = db_participant(&room, 3);
    let actor = member(mine.user_id);

    let found = room.clone();
    ctx.room_repo
        .expect_get_room_by_link_code()
        .returning(move |_| Ok(Some(found.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .returning(move |_| Ok(vec![mine.clone()]));
    ctx.participant_repo.expect_add_participant().times(0);

    let err = test_join_wrapper(&ctx, "Fut5alXY", actor).await.unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_after_leaving_goes_to_the_back() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(2), 2);
    let mut left = db_participant(&room, 1);
    left.is_active = false;
    let user_id = left.user_id;
    let existing = vec![db_participant(&room, 0), left, db_participant(&room, 2)];

    let found = room.clone();
    ctx.room_repo
        .expect_get_room_by_link_code()
        .returning(move |_| Ok(Some(found.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .returning(move |_| Ok(existing.clone()));
    ctx.participant_repo
        .expect_add_participant()
        .times(1)
        .returning(|room_id, user_id| Ok(new_row(room_id, user_id)));

    let seat = test_join_wrapper(&ctx, "Fut5alXY", member(user_id)).await.unwrap();

    assert_eq!(seat, SeatStatus::Waiting { position: 1 });
}

#[tokio::test]
async fn test_join_closed_room_is_rejected() {
    let mut ctx = TestContext::new();
    let mut room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(2), 10);
    room.is_active = false;

    ctx.room_repo
        .expect_get_room_by_link_code()
        .returning(move |_| Ok(Some(room.clone())));
    ctx.participant_repo
        .expect_get_participants_by_room()
        .returning(|_| Ok(Vec::new()));
    ctx.participant_repo.expect_add_participant().times(0);

    let err = test_join_wrapper(&ctx, "Fut5alXY", member(Uuid::new_v4())).await.unwrap_err();

    assert!(matches!(err.0, BookingError::Validation(ref m) if m.contains("closed")));
}

#[tokio::test]
async fn test_join_unknown_room_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.room_repo
        .expect_get_room_by_link_code()
        .with(predicate::eq("missing1"))
        .returning(|_| Ok(None));

    let err = test_join_wrapper(&ctx, "missing1", member(Uuid::new_v4())).await.unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overlapping_court_booking_conflicts() {
    let mut ctx = TestContext::new();
    let court = db_court(100.0, 12);
    let court_id = court.id;
    let mut booked = db_room(Uuid::new_v4(), Utc.with_ymd_and_hms(2030, 3, 14, 18, 0, 0).unwrap(), 10);
    booked.court_id = Some(court_id);
    let booked_room = Room::from(booked.clone());

    ctx.court_repo
        .expect_get_court_by_id()
        .with(predicate::eq(court_id))
        .returning(move |_| Ok(Some(court.clone())));
    ctx.room_repo
        .expect_get_court_reservations()
        .returning(move |_| Ok(vec![booked.clone()]));

    let overlapping = test_court_check_wrapper(&ctx, &draft_for(court_id, 19, 2), None).await;
    let err = overlapping.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let back_to_back = test_court_check_wrapper(&ctx, &draft_for(court_id, 20, 1), None).await;
    assert!(back_to_back.is_ok());

    let editing_itself = test_court_check_wrapper(&ctx, &draft_for(court_id, 18, 3), Some(&booked_room)).await;
    assert!(editing_itself.is_ok());
}

#[tokio::test]
async fn test_closed_rooms_do_not_hold_the_court() {
    let mut ctx = TestContext::new();
    let court = db_court(100.0, 12);
    let court_id = court.id;
    let mut closed = db_room(Uuid::new_v4(), Utc.with_ymd_and_hms(2030, 3, 14, 18, 0, 0).unwrap(), 10);
    closed.court_id = Some(court_id);
    closed.is_active = false;

    ctx.court_repo
        .expect_get_court_by_id()
        .returning(move |_| Ok(Some(court.clone())));
    ctx.room_repo
        .expect_get_court_reservations()
        .returning(move |_| Ok(vec![closed.clone()]));

    assert!(test_court_check_wrapper(&ctx, &draft_for(court_id, 18, 2), None).await.is_ok());
}

#[tokio::test]
async fn test_inactive_or_small_court_rejects_booking() {
    let mut ctx = TestContext::new();
    let mut inactive = db_court(100.0, 12);
    inactive.is_active = false;
    let inactive_id = inactive.id;
    let small = db_court(100.0, 4);
    let small_id = small.id;

    ctx.court_repo
        .expect_get_court_by_id()
        .returning(move |id| {
            Ok([inactive.clone(), small.clone()].into_iter().find(|c| c.id == id))
        });
    ctx.room_repo.expect_get_court_reservations().times(0);

    let err = test_court_check_wrapper(&ctx, &draft_for(inactive_id, 9, 1), None).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let err = test_court_check_wrapper(&ctx, &draft_for(small_id, 9, 1), None).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = test_court_check_wrapper(&ctx, &draft_for(Uuid::new_v4(), 9, 1), None).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_room_keeps_its_court_after_deactivation() {
    let mut ctx = TestContext::new();
    let mut court = db_court(100.0, 10);
    court.is_active = false;
    let court_id = court.id;
    let mut booked = db_room(Uuid::new_v4(), Utc.with_ymd_and_hms(2030, 3, 14, 18, 0, 0).unwrap(), 10);
    booked.court_id = Some(court_id);
    let mut stored = Room::from(booked.clone());

    ctx.court_repo
        .expect_get_court_by_id()
        .returning(move |_| Ok(Some(court.clone())));
    ctx.room_repo
        .expect_get_court_reservations()
        .returning(move |_| Ok(vec![booked.clone()]));

    // Editing the description of an active room leaves its booking alone
    let mut edit = draft_for(court_id, 18, 2);
    edit.description = Some("Bring a white shirt".to_string());
    assert!(test_court_check_wrapper(&ctx, &edit, Some(&stored)).await.is_ok());

    // Growing past the court still fails
    edit.max_participants = 12;
    let err = test_court_check_wrapper(&ctx, &edit, Some(&stored)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    // Reopening a closed room needs an active court
    stored.is_active = false;
    let err = test_court_check_wrapper(&ctx, &draft_for(court_id, 18, 2), Some(&stored)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    // A new room cannot take the court either
    let err = test_court_check_wrapper(&ctx, &draft_for(court_id, 9, 1), None).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_leaving_promotes_first_waiting_participant() {
    let mut ctx = TestContext::new();
    let room = db_room(Uuid::new_v4(), Utc::now() + Duration::days(1), 2);
    let organizer = db_participant(&room, 0);
    let leaver = db_participant(&room, 1);
    let waiting = db_participant(&room, 2);
    let leaver_id = leaver.id;
    let waiting_id = waiting.id;

    let mut participants = into_participants(vec![organizer, leaver.clone(), waiting]).unwrap();
    let room: Room = room.into();
    assert_eq!(
        allocate(&participants, room.capacity()).status_of(waiting_id),
        Some(SeatStatus::Waiting { position: 1 })
    );

    ctx.participant_repo
        .expect_set_participant_active()
        .with(predicate::eq(leaver_id), predicate::eq(false))
        .times(1)
        .returning(|_, _| Ok(true));

    let leaving = policy::leaving_participation(&room, &member(leaver.user_id), &participants).unwrap();
    assert!(ctx.participant_repo.set_participant_active(leaving.id, false).await.unwrap());

    participants.iter_mut().filter(|p| p.id == leaver_id).for_each(|p| p.is_active = false);

    assert_eq!(
        allocate(&participants, room.capacity()).status_of(waiting_id),
        Some(SeatStatus::Confirmed)
    );
}

#[tokio::test]
async fn test_organizer_cannot_leave() {
    let creator = Uuid::new_v4();
    let room = db_room(creator, Utc::now() + Duration::days(1), 2);
    let mut organizer = db_participant(&room, 0);
    organizer.user_id = creator;
    let participants = into_participants(vec![organizer]).unwrap();
    let room: Room = room.into();

    let err = policy::leaving_participation(&room, &member(creator), &participants).unwrap_err();

    assert_eq!(AppError(err).status(), StatusCode::BAD_REQUEST);
}
