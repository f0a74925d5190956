use crate::models::DbCourt;
use chrono::Utc;
use courtside_core::models::court::CourtDraft;
use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

const COURT_COLUMNS: &str =
    "id, name, sport_type, location, city, description, hourly_price, capacity, is_active, created_at";

pub async fn create_court(pool: &Pool<Postgres>, draft: &CourtDraft) -> Result<DbCourt> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating court: id={}, name={}", id, draft.name);

    let court = sqlx::query_as::<_, DbCourt>(&format!(
        r#"
        INSERT INTO courts (id, name, sport_type, location, city, description, hourly_price, capacity, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COURT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.sport_type)
    .bind(&draft.location)
    .bind(&draft.city)
    .bind(&draft.description)
    .bind(draft.hourly_price)
    .bind(draft.capacity)
    .bind(draft.is_active)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(court)
}

pub async fn get_court_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbCourt>>
where
    E: Executor<'e, Database = Postgres>,
{
    let court = sqlx::query_as::<_, DbCourt>(&format!(
        "SELECT {COURT_COLUMNS} FROM courts WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(court)
}

pub async fn list_courts(pool: &Pool<Postgres>, include_inactive: bool) -> Result<Vec<DbCourt>> {
    let courts = sqlx::query_as::<_, DbCourt>(&format!(
        r#"
        SELECT {COURT_COLUMNS}
        FROM courts
        WHERE is_active OR $1
        ORDER BY name ASC
        "#
    ))
    .bind(include_inactive)
    .fetch_all(pool)
    .await?;

    Ok(courts)
}

pub async fn update_court(pool: &Pool<Postgres>, id: Uuid, draft: &CourtDraft) -> Result<Option<DbCourt>> {
    let court = sqlx::query_as::<_, DbCourt>(&format!(
        r#"
        UPDATE courts
        SET name = $2, sport_type = $3, location = $4, city = $5, description = $6,
            hourly_price = $7, capacity = $8, is_active = $9
        WHERE id = $1
        RETURNING {COURT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.sport_type)
    .bind(&draft.location)
    .bind(&draft.city)
    .bind(&draft.description)
    .bind(draft.hourly_price)
    .bind(draft.capacity)
    .bind(draft.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(court)
}

/// Courts are never hard-deleted because past rooms still reference them.
pub async fn deactivate_court(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("UPDATE courts SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
