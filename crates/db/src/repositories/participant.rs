use crate::models::DbParticipant;
use chrono::Utc;
use courtside_core::models::participant::{Participant, PaymentStatus};
use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

const PARTICIPANT_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.room_id, u.name AS user_name, u.email AS user_email,
           p.registered_at, p.is_active, p.checked_in, p.payment_status,
           p.payment_method, p.payment_date, p.notes
    FROM participants p
    JOIN users u ON u.id = p.user_id
"#;

/// Registers a user in a room with `registered_at = now`, which puts them at
/// the back of the queue.
pub async fn add_participant<'e, E>(executor: E, room_id: Uuid, user_id: Uuid) -> Result<DbParticipant>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();

    tracing::debug!("Adding participant: id={}, room_id={}, user_id={}", id, room_id, user_id);

    let participant = sqlx::query_as::<_, DbParticipant>(
        r#"
        WITH inserted AS (
            INSERT INTO participants (id, user_id, room_id, registered_at, is_active, checked_in, payment_status)
            VALUES ($1, $2, $3, $4, TRUE, FALSE, $5)
            RETURNING *
        )
        SELECT i.id, i.user_id, i.room_id, u.name AS user_name, u.email AS user_email,
               i.registered_at, i.is_active, i.checked_in, i.payment_status,
               i.payment_method, i.payment_date, i.notes
        FROM inserted i
        JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(room_id)
    .bind(Utc::now())
    .bind(PaymentStatus::Pending.as_str())
    .fetch_one(executor)
    .await?;

    Ok(participant)
}

pub async fn get_participant_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbParticipant>> {
    let participant = sqlx::query_as::<_, DbParticipant>(&format!(
        "{PARTICIPANT_SELECT} WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(participant)
}

/// All participants of a room, active or not, in registration order.
pub async fn get_participants_by_room<'e, E>(executor: E, room_id: Uuid) -> Result<Vec<DbParticipant>>
where
    E: Executor<'e, Database = Postgres>,
{
    let participants = sqlx::query_as::<_, DbParticipant>(&format!(
        "{PARTICIPANT_SELECT} WHERE p.room_id = $1 ORDER BY p.registered_at ASC, p.id ASC"
    ))
    .bind(room_id)
    .fetch_all(executor)
    .await?;

    Ok(participants)
}

pub async fn get_participants_for_rooms(
    pool: &Pool<Postgres>,
    room_ids: &[Uuid],
) -> Result<Vec<DbParticipant>> {
    if room_ids.is_empty() {
        return Ok(Vec::new());
    }

    let participants = sqlx::query_as::<_, DbParticipant>(&format!(
        "{PARTICIPANT_SELECT} WHERE p.room_id = ANY($1) ORDER BY p.registered_at ASC, p.id ASC"
    ))
    .bind(room_ids)
    .fetch_all(pool)
    .await?;

    Ok(participants)
}

pub async fn get_active_participations_by_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbParticipant>> {
    let participants = sqlx::query_as::<_, DbParticipant>(&format!(
        "{PARTICIPANT_SELECT} WHERE p.user_id = $1 AND p.is_active ORDER BY p.registered_at ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(participants)
}

pub async fn set_participant_active(pool: &Pool<Postgres>, id: Uuid, is_active: bool) -> Result<bool> {
    tracing::debug!("Setting participant active: id={}, is_active={}", id, is_active);

    let result = sqlx::query("UPDATE participants SET is_active = $2 WHERE id = $1")
        .bind(id)
        .bind(is_active)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Writes back the mutable fields of an edited participant.
pub async fn update_participant(pool: &Pool<Postgres>, participant: &Participant) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE participants
        SET is_active = $2, checked_in = $3, payment_status = $4, payment_method = $5,
            payment_date = $6, notes = $7
        WHERE id = $1
        "#,
    )
    .bind(participant.id)
    .bind(participant.is_active)
    .bind(participant.checked_in)
    .bind(participant.payment_status.as_str())
    .bind(&participant.payment_method)
    .bind(participant.payment_date)
    .bind(&participant.notes)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_participant(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM participants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
