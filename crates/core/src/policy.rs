//! Who may see and change a room.

use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::court::Court;
use crate::models::participant::{Participant, UpdateParticipantRequest};
use crate::models::room::{Room, RoomDraft};

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_admin: bool,
}

pub fn is_owner(room: &Room, actor: Option<&Actor>) -> bool {
    actor.is_some_and(|a| a.user_id == room.creator_id)
}

pub fn active_participation<'a>(
    participants: &'a [Participant],
    user_id: Uuid,
) -> Option<&'a Participant> {
    participants
        .iter()
        .find(|p| p.user_id == user_id && p.is_active)
}

/// Private rooms are visible to their creator, their active participants and admins.
pub fn ensure_can_view(
    room: &Room,
    actor: Option<&Actor>,
    participants: &[Participant],
) -> BookingResult<()> {
    if !room.is_private {
        return Ok(());
    }

    match actor {
        None => Err(BookingError::Authentication(
            "This is a private room. Log in to access it".to_string(),
        )),
        Some(actor)
            if actor.is_admin
                || actor.user_id == room.creator_id
                || active_participation(participants, actor.user_id).is_some() =>
        {
            Ok(())
        }
        Some(_) => Err(BookingError::Authorization(
            "This is a private room. Only the organizer and participants can access it"
                .to_string(),
        )),
    }
}

pub fn ensure_can_manage(room: &Room, actor: &Actor) -> BookingResult<()> {
    if actor.is_admin || actor.user_id == room.creator_id {
        Ok(())
    } else {
        Err(BookingError::Authorization(
            "You do not have permission to manage this room".to_string(),
        ))
    }
}

pub fn ensure_admin(actor: &Actor) -> BookingResult<()> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(BookingError::Authorization(
            "Administrator access required".to_string(),
        ))
    }
}

pub fn ensure_can_join(room: &Room, actor: &Actor, participants: &[Participant]) -> BookingResult<()> {
    if !room.is_active {
        return Err(BookingError::Validation("This room has been closed".to_string()));
    }

    if active_participation(participants, actor.user_id).is_some() {
        return Err(BookingError::Validation(
            "You are already participating in this room".to_string(),
        ));
    }

    Ok(())
}

/// The participation a user gives up when leaving. Organizers cannot leave.
pub fn leaving_participation<'a>(
    room: &Room,
    actor: &Actor,
    participants: &'a [Participant],
) -> BookingResult<&'a Participant> {
    if actor.user_id == room.creator_id {
        return Err(BookingError::Validation(
            "As the organizer you cannot leave the room".to_string(),
        ));
    }

    active_participation(participants, actor.user_id).ok_or_else(|| {
        BookingError::Validation("You are not participating in this room".to_string())
    })
}

pub fn ensure_can_remove(room: &Room, participant: &Participant) -> BookingResult<()> {
    if participant.room_id != room.id {
        return Err(BookingError::NotFound(format!(
            "Participant {} does not belong to this room",
            participant.id
        )));
    }

    if participant.user_id == room.creator_id {
        return Err(BookingError::Validation(
            "The organizer cannot be removed from the room".to_string(),
        ));
    }

    Ok(())
}

/// Reactivating an old registration must not give its user a second seat.
pub fn ensure_can_reactivate(
    participant: &Participant,
    update: &UpdateParticipantRequest,
    participants: &[Participant],
) -> BookingResult<()> {
    if participant.is_active || update.is_active != Some(true) {
        return Ok(());
    }

    match active_participation(participants, participant.user_id) {
        Some(current) if current.id != participant.id => Err(BookingError::Validation(format!(
            "{} already holds an active registration in this room",
            participant.user_name
        ))),
        _ => Ok(()),
    }
}

/// A room may only be bound to an active court that can hold its players.
///
/// `existing` is the room as stored before an edit. An active room that keeps
/// its court is not affected by the court being deactivated later, and only
/// a capacity increase is checked against the court.
pub fn ensure_court_bookable(
    court: &Court,
    draft: &RoomDraft,
    existing: Option<&Room>,
) -> BookingResult<()> {
    let kept = existing.filter(|room| room.is_active && room.court_id == Some(court.id));

    if !court.is_active && kept.is_none() {
        return Err(BookingError::Conflict(format!(
            "Court '{}' is not accepting bookings",
            court.name
        )));
    }

    let grows = kept.is_none_or(|room| draft.max_participants > room.max_participants);
    if grows && draft.max_participants > court.capacity {
        return Err(BookingError::Validation(format!(
            "Court '{}' holds at most {} participants",
            court.name, court.capacity
        )));
    }

    Ok(())
}
