//! Database queries for the `job_centres` table.
//!
//! Functions take any Postgres executor so the importer can run them inside
//! its transaction (or a savepoint) while the HTTP listing uses the pool.

use sqlx::types::Json;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::types::{JobCentre, ListJobCentresQuery, NewJobCentre};

/// True when a job centre with exactly this (name, state) is already stored.
pub async fn exists_by_name_and_state<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
    state: &str,
) -> sqlx::Result<bool> {
    sqlx::query_scalar(
        r#"SELECT EXISTS (SELECT 1 FROM job_centres WHERE name = $1 AND state = $2)"#,
    )
    .bind(name)
    .bind(state)
    .fetch_one(executor)
    .await
}

/// Insert one job centre, returning its new id.
pub async fn insert_job_centre<'e>(
    executor: impl PgExecutor<'e>,
    centre: &NewJobCentre,
) -> sqlx::Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO job_centres (id, name, category, description, address, state, city,
            contact_number, email, website, services, operating_hours,
            is_verified, is_government, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(&centre.name)
    .bind(centre.category.as_str())
    .bind(centre.description.as_deref())
    .bind(centre.address.as_deref())
    .bind(&centre.state)
    .bind(&centre.city)
    .bind(centre.contact_number.as_deref())
    .bind(centre.email.as_deref())
    .bind(centre.website.as_deref())
    .bind(Json(&centre.services))
    .bind(centre.operating_hours.as_deref())
    .bind(centre.is_verified)
    .bind(centre.is_government)
    .bind(centre.is_active)
    .execute(executor)
    .await?;

    Ok(id)
}

/// List job centres, newest first, optionally filtered by state and category.
pub async fn list_job_centres<'e>(
    executor: impl PgExecutor<'e>,
    query: &ListJobCentresQuery,
) -> sqlx::Result<Vec<JobCentre>> {
    sqlx::query_as::<_, JobCentre>(
        r#"
        SELECT id, name, category, description, address, state, city,
            contact_number, email, website, services, operating_hours,
            is_verified, is_government, is_active, created_at, updated_at
        FROM job_centres
        WHERE ($1::text IS NULL OR state = $1)
          AND ($2::text IS NULL OR category = $2)
        ORDER BY created_at DESC, name
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.state.as_deref())
    .bind(query.category.map(|c| c.as_str()))
    .bind(query.limit)
    .bind(query.offset)
    .fetch_all(executor)
    .await
}

/// Count job centres matching the same filters as [`list_job_centres`].
pub async fn count_job_centres<'e>(
    executor: impl PgExecutor<'e>,
    query: &ListJobCentresQuery,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM job_centres
        WHERE ($1::text IS NULL OR state = $1)
          AND ($2::text IS NULL OR category = $2)
        "#,
    )
    .bind(query.state.as_deref())
    .bind(query.category.map(|c| c.as_str()))
    .fetch_one(executor)
    .await
}

// =============================================================================
// Integration tests (require a live DB, run with DATABASE_URL and --ignored)
// =============================================================================
