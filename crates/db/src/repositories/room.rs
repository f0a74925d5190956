use crate::models::DbRoom;
use chrono::{NaiveDate, Utc};
use courtside_core::availability::Interval;
use courtside_core::models::room::RoomDraft;
use eyre::Result;
use rand::{Rng, distributions::Alphanumeric};
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

pub const LINK_CODE_LEN: usize = 8;

const ROOM_COLUMNS: &str = "id, name, sport, date, duration_hours, max_participants, description, \
     city, location, link_code, is_private, is_active, creator_id, court_id, price_per_person, created_at";

/// Random URL-safe code used in shareable room links.
pub fn generate_link_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LINK_CODE_LEN)
        .map(char::from)
        .collect()
}

/// Filters for the public room listing.
#[derive(Debug, Clone, Default)]
pub struct RoomFilter<'a> {
    pub sport: Option<&'a str>,
    pub city: Option<&'a str>,
    /// Private rooms created by this user are included.
    pub viewer_id: Option<Uuid>,
}

pub async fn create_room<'e, E>(executor: E, creator_id: Uuid, draft: &RoomDraft) -> Result<DbRoom>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let link_code = generate_link_code();

    tracing::debug!(
        "Creating room: id={}, name={}, date={}, court_id={:?}",
        id, draft.name, draft.date, draft.court_id
    );

    let room = sqlx::query_as::<_, DbRoom>(&format!(
        r#"
        INSERT INTO rooms (id, name, sport, date, duration_hours, max_participants, description,
                           city, location, link_code, is_private, is_active, creator_id, court_id,
                           price_per_person, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, $12, $13, $14, $15)
        RETURNING {ROOM_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.sport)
    .bind(draft.date)
    .bind(draft.duration_hours)
    .bind(draft.max_participants)
    .bind(&draft.description)
    .bind(&draft.city)
    .bind(&draft.location)
    .bind(&link_code)
    .bind(draft.is_private)
    .bind(creator_id)
    .bind(draft.court_id)
    .bind(draft.price_per_person)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(room)
}

pub async fn get_room_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbRoom>>
where
    E: Executor<'e, Database = Postgres>,
{
    let room = sqlx::query_as::<_, DbRoom>(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(room)
}

pub async fn get_room_by_link_code(pool: &Pool<Postgres>, link_code: &str) -> Result<Option<DbRoom>> {
    tracing::debug!("Getting room by link code: {}", link_code);

    let room = sqlx::query_as::<_, DbRoom>(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE link_code = $1"
    ))
    .bind(link_code)
    .fetch_optional(pool)
    .await?;

    Ok(room)
}

/// Active rooms visible to the viewer, ordered by date.
///
/// Sport matches case-insensitively on a substring, city on the full name.
pub async fn list_active_rooms(pool: &Pool<Postgres>, filter: &RoomFilter<'_>) -> Result<Vec<DbRoom>> {
    let sport_pattern = filter.sport.map(|s| format!("%{}%", s));

    let rooms = sqlx::query_as::<_, DbRoom>(&format!(
        r#"
        SELECT {ROOM_COLUMNS}
        FROM rooms
        WHERE is_active
          AND (NOT is_private OR creator_id = $1)
          AND ($2::TEXT IS NULL OR sport ILIKE $2)
          AND ($3::TEXT IS NULL OR LOWER(city) = LOWER($3))
        ORDER BY date ASC
        "#
    ))
    .bind(filter.viewer_id)
    .bind(sport_pattern)
    .bind(filter.city)
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

/// Every room, optionally narrowed to one sport and one UTC day.
pub async fn list_rooms(
    pool: &Pool<Postgres>,
    sport: Option<&str>,
    day: Option<NaiveDate>,
) -> Result<Vec<DbRoom>> {
    let window = day.map(Interval::day);

    let rooms = sqlx::query_as::<_, DbRoom>(&format!(
        r#"
        SELECT {ROOM_COLUMNS}
        FROM rooms
        WHERE ($1::TEXT IS NULL OR sport = $1)
          AND ($2::TIMESTAMPTZ IS NULL OR (date >= $2 AND date < $3))
        ORDER BY date ASC
        "#
    ))
    .bind(sport)
    .bind(window.map(|w| w.start))
    .bind(window.map(|w| w.end))
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

pub async fn list_rooms_by_creator(pool: &Pool<Postgres>, creator_id: Uuid) -> Result<Vec<DbRoom>> {
    let rooms = sqlx::query_as::<_, DbRoom>(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE creator_id = $1 ORDER BY date ASC"
    ))
    .bind(creator_id)
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

pub async fn list_rooms_by_ids(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<Vec<DbRoom>> {
    let rooms = sqlx::query_as::<_, DbRoom>(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ANY($1) ORDER BY date ASC"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

/// Active rooms holding `court_id`, optionally only those overlapping `window`.
pub async fn get_court_reservations<'e, E>(
    executor: E,
    court_id: Uuid,
    window: Option<Interval>,
) -> Result<Vec<DbRoom>>
where
    E: Executor<'e, Database = Postgres>,
{
    let rooms = sqlx::query_as::<_, DbRoom>(&format!(
        r#"
        SELECT {ROOM_COLUMNS}
        FROM rooms
        WHERE court_id = $1
          AND is_active
          AND ($2::TIMESTAMPTZ IS NULL
               OR (date < $3 AND date + make_interval(hours => duration_hours) > $2))
        ORDER BY date ASC
        "#
    ))
    .bind(court_id)
    .bind(window.map(|w| w.start))
    .bind(window.map(|w| w.end))
    .fetch_all(executor)
    .await?;

    Ok(rooms)
}

pub async fn update_room<'e, E>(executor: E, id: Uuid, draft: &RoomDraft, is_active: bool) -> Result<Option<DbRoom>>
where
    E: Executor<'e, Database = Postgres>,
{
    tracing::debug!("Updating room: id={}, is_active={}", id, is_active);

    let room = sqlx::query_as::<_, DbRoom>(&format!(
        r#"
        UPDATE rooms
        SET name = $2, sport = $3, date = $4, duration_hours = $5, max_participants = $6,
            description = $7, city = $8, location = $9, is_private = $10, court_id = $11,
            price_per_person = $12, is_active = $13
        WHERE id = $1
        RETURNING {ROOM_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.sport)
    .bind(draft.date)
    .bind(draft.duration_hours)
    .bind(draft.max_participants)
    .bind(&draft.description)
    .bind(&draft.city)
    .bind(&draft.location)
    .bind(draft.is_private)
    .bind(draft.court_id)
    .bind(draft.price_per_person)
    .bind(is_active)
    .fetch_optional(executor)
    .await?;

    Ok(room)
}

pub async fn set_room_active(pool: &Pool<Postgres>, id: Uuid, is_active: bool) -> Result<bool> {
    let result = sqlx::query("UPDATE rooms SET is_active = $2 WHERE id = $1")
        .bind(id)
        .bind(is_active)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes the room; its participants go with it through `ON DELETE CASCADE`.
pub async fn delete_room(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
