//! Repository for the `planting_log_entries` table.
//!
//! The `year` column is never bound from a DTO: every INSERT and UPDATE
//! recomputes it from the sowing date inside the statement, so a client
//! cannot set it independently.

use garten_core::types::DbId;
use sqlx::PgPool;

use crate::models::planting_log::{
    CreatePlantingLogEntry, PlantingLogEntry, PlantingLogFilter, UpdatePlantingLogEntry,
};

/// Joined column list shared across queries.
const COLUMNS: &str = "p.id, p.variety_id, v.name AS variety_name, p.year, \
    p.sowing_date, p.seed_count, p.sowing_method, p.container, \
    p.transplant_date, p.planting_date, p.description, p.latitude, \
    p.longitude, p.gps_accuracy_m, p.created_at, p.updated_at";

/// Shared FROM clause. The category join carries the category filter and
/// the category-name sort.
const FROM: &str = "planting_log_entries p
    JOIN varieties v ON v.id = p.variety_id
    JOIN categories c ON c.id = v.category_id";

/// Shared INSERT statement. `year` is derived from the bound sowing date.
const INSERT: &str = "INSERT INTO planting_log_entries
    (variety_id, year, sowing_date, seed_count, sowing_method, container,
     transplant_date, planting_date, description, latitude, longitude,
     gps_accuracy_m)
 VALUES ($1, CAST(EXTRACT(YEAR FROM $2::date) AS smallint), $2,
         COALESCE($3, 0), COALESCE($4, 'ANZUCHT'), COALESCE($5, ''),
         $6, $7, COALESCE($8, ''), $9, $10, $11)";

/// Provides CRUD operations for planting-log entries.
pub struct PlantingLogRepo;

impl PlantingLogRepo {
    /// Insert a new entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlantingLogEntry,
    ) -> Result<PlantingLogEntry, sqlx::Error> {
        let query = format!("{INSERT} RETURNING id");
        let id: DbId = sqlx::query_scalar(&query)
            .bind(input.variety_id)
            .bind(input.sowing_date)
            .bind(input.seed_count)
            .bind(&input.sowing_method)
            .bind(&input.container)
            .bind(input.transplant_date)
            .bind(input.planting_date)
            .bind(&input.description)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.gps_accuracy_m)
            .fetch_one(pool)
            .await?;
        Self::fetch_joined(pool, id).await
    }

    /// Insert a new entry unless one already exists for the same
    /// (variety, year, sowing date). Returns `None` when the key was
    /// already present; the existing row is left untouched.
    pub async fn create_if_absent(
        pool: &PgPool,
        input: &CreatePlantingLogEntry,
    ) -> Result<Option<PlantingLogEntry>, sqlx::Error> {
        let query = format!(
            "{INSERT}
             ON CONFLICT ON CONSTRAINT uq_planting_log_identity DO NOTHING
             RETURNING id"
        );
        let id: Option<DbId> = sqlx::query_scalar(&query)
            .bind(input.variety_id)
            .bind(input.sowing_date)
            .bind(input.seed_count)
            .bind(&input.sowing_method)
            .bind(&input.container)
            .bind(input.transplant_date)
            .bind(input.planting_date)
            .bind(&input.description)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.gps_accuracy_m)
            .fetch_optional(pool)
            .await?;

        match id {
            Some(id) => Ok(Some(Self::fetch_joined(pool, id).await?)),
            None => Ok(None),
        }
    }

    /// Find an entry by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PlantingLogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, PlantingLogEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries with optional year/category/variety filters and a
    /// whitelisted sort order.
    pub async fn list(
        pool: &PgPool,
        filter: &PlantingLogFilter,
    ) -> Result<Vec<PlantingLogEntry>, sqlx::Error> {
        let order = order_clause(filter.sort.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             WHERE ($1::smallint IS NULL OR p.year = $1)
               AND ($2::bigint IS NULL OR v.category_id = $2)
               AND ($3::bigint IS NULL OR p.variety_id = $3)
             ORDER BY {order}"
        );
        sqlx::query_as::<_, PlantingLogEntry>(&query)
            .bind(filter.year)
            .bind(filter.category_id)
            .bind(filter.variety_id)
            .fetch_all(pool)
            .await
    }

    /// Distinct years with at least one entry, most recent first.
    pub async fn distinct_years(pool: &PgPool) -> Result<Vec<i16>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT year FROM planting_log_entries ORDER BY year DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update an entry. Only non-`None` fields in `input` are applied;
    /// `year` always tracks the (possibly updated) sowing date.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlantingLogEntry,
    ) -> Result<Option<PlantingLogEntry>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE planting_log_entries SET
                variety_id = COALESCE($2, variety_id),
                sowing_date = COALESCE($3, sowing_date),
                year = CAST(EXTRACT(YEAR FROM COALESCE($3, sowing_date)) AS smallint),
                seed_count = COALESCE($4, seed_count),
                sowing_method = COALESCE($5, sowing_method),
                container = COALESCE($6, container),
                transplant_date = COALESCE($7, transplant_date),
                planting_date = COALESCE($8, planting_date),
                description = COALESCE($9, description),
                latitude = COALESCE($10, latitude),
                longitude = COALESCE($11, longitude),
                gps_accuracy_m = COALESCE($12, gps_accuracy_m),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(input.variety_id)
        .bind(input.sowing_date)
        .bind(input.seed_count)
        .bind(&input.sowing_method)
        .bind(&input.container)
        .bind(input.transplant_date)
        .bind(input.planting_date)
        .bind(&input.description)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.gps_accuracy_m)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Ok(Some(Self::fetch_joined(pool, id).await?)),
            None => Ok(None),
        }
    }

    /// Delete an entry by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM planting_log_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of entries.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM planting_log_entries")
            .fetch_one(pool)
            .await
    }

    /// Fetch the joined row for an ID that is known to exist.
    async fn fetch_joined(pool: &PgPool, id: DbId) -> Result<PlantingLogEntry, sqlx::Error> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}

/// Map a client-supplied sort key to an ORDER BY clause. Unknown values
/// fall back to the default `-year, sowing_date` ordering.
pub fn order_clause(sort: Option<&str>) -> &'static str {
    match sort.unwrap_or("-year") {
        "year" => "p.year, p.sowing_date",
        "-year" => "p.year DESC, p.sowing_date",
        "sowing_date" => "p.sowing_date",
        "-sowing_date" => "p.sowing_date DESC",
        "variety_name" => "v.name, p.sowing_date",
        "-variety_name" => "v.name DESC, p.sowing_date",
        "category_name" => "c.name, p.sowing_date",
        "-category_name" => "c.name DESC, p.sowing_date",
        _ => "p.year DESC, p.sowing_date",
    }
}
