//! Repository for the `varieties` table.
//!
//! All reads join the category and species names in, matching what the
//! API exposes. Writes insert/update the base table and then re-read the
//! joined row.

use garten_core::types::DbId;
use sqlx::PgPool;

use crate::models::variety::{CreateVariety, UpdateVariety, Variety};

/// Joined column list shared across queries.
const COLUMNS: &str = "v.id, v.name, v.category_id, c.name AS category_name, \
    v.species_id, s.name AS species_name, v.sowing_start_month, \
    v.sowing_end_month, v.info_url, v.stock_quantity, v.stock_unit, \
    v.created_at, v.updated_at";

/// Shared FROM clause with the reference joins.
const FROM: &str = "varieties v
    JOIN categories c ON c.id = v.category_id
    LEFT JOIN species s ON s.id = v.species_id";

/// Provides CRUD operations for varieties.
pub struct VarietyRepo;

impl VarietyRepo {
    /// Insert a new variety, returning the created row.
    ///
    /// If `stock_quantity` is `None`, defaults to 0.
    /// If `stock_unit` is `None`, defaults to `'ANZ'`.
    pub async fn create(pool: &PgPool, input: &CreateVariety) -> Result<Variety, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO varieties
                (name, category_id, species_id, sowing_start_month,
                 sowing_end_month, info_url, stock_quantity, stock_unit)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, ''),
                     COALESCE($7, 0), COALESCE($8, 'ANZ'))
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.species_id)
        .bind(input.sowing_start_month)
        .bind(input.sowing_end_month)
        .bind(&input.info_url)
        .bind(input.stock_quantity)
        .bind(&input.stock_unit)
        .fetch_one(pool)
        .await?;

        Self::fetch_joined(pool, id).await
    }

    /// Find a variety by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Variety>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE v.id = $1");
        sqlx::query_as::<_, Variety>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List varieties matching a name case-insensitively, ordered by ID.
    ///
    /// Ordering by ID gives callers a deterministic first pick when the
    /// name is ambiguous.
    pub async fn list_by_name_ci(pool: &PgPool, name: &str) -> Result<Vec<Variety>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             WHERE LOWER(v.name) = LOWER($1)
             ORDER BY v.id"
        );
        sqlx::query_as::<_, Variety>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }

    /// List varieties, optionally filtered by category, ordered by
    /// category name then variety name.
    pub async fn list(
        pool: &PgPool,
        category_id: Option<DbId>,
    ) -> Result<Vec<Variety>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             WHERE ($1::bigint IS NULL OR v.category_id = $1)
             ORDER BY c.name, v.name"
        );
        sqlx::query_as::<_, Variety>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Update a variety. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVariety,
    ) -> Result<Option<Variety>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE varieties SET
                name = COALESCE($2, name),
                category_id = COALESCE($3, category_id),
                species_id = COALESCE($4, species_id),
                sowing_start_month = COALESCE($5, sowing_start_month),
                sowing_end_month = COALESCE($6, sowing_end_month),
                info_url = COALESCE($7, info_url),
                stock_quantity = COALESCE($8, stock_quantity),
                stock_unit = COALESCE($9, stock_unit),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.species_id)
        .bind(input.sowing_start_month)
        .bind(input.sowing_end_month)
        .bind(&input.info_url)
        .bind(input.stock_quantity)
        .bind(&input.stock_unit)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Ok(Some(Self::fetch_joined(pool, id).await?)),
            None => Ok(None),
        }
    }

    /// Upsert a variety by exact name.
    ///
    /// If a variety with this name exists, all its fields are overwritten
    /// (with the DTO's defaults applied, including clearing the sowing
    /// months when absent); otherwise a new row is created. With duplicate
    /// names, the lowest-id row is the one updated. Returns the row and
    /// whether it was created.
    pub async fn upsert_by_name(
        pool: &PgPool,
        input: &CreateVariety,
    ) -> Result<(Variety, bool), sqlx::Error> {
        let existing: Option<DbId> = sqlx::query_scalar(
            "UPDATE varieties SET
                category_id = $2,
                species_id = $3,
                sowing_start_month = $4,
                sowing_end_month = $5,
                info_url = COALESCE($6, ''),
                stock_quantity = COALESCE($7, 0),
                stock_unit = COALESCE($8, 'ANZ'),
                updated_at = NOW()
             WHERE id = (SELECT id FROM varieties WHERE name = $1 ORDER BY id LIMIT 1)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.species_id)
        .bind(input.sowing_start_month)
        .bind(input.sowing_end_month)
        .bind(&input.info_url)
        .bind(input.stock_quantity)
        .bind(&input.stock_unit)
        .fetch_optional(pool)
        .await?;

        match existing {
            Some(id) => Ok((Self::fetch_joined(pool, id).await?, false)),
            None => Ok((Self::create(pool, input).await?, true)),
        }
    }

    /// Delete a variety by ID. Returns `true` if a row was deleted.
    /// Fails with a foreign-key violation while planting-log entries
    /// reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM varieties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of varieties.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM varieties")
            .fetch_one(pool)
            .await
    }

    /// Fetch the joined row for an ID that is known to exist.
    async fn fetch_joined(pool: &PgPool, id: DbId) -> Result<Variety, sqlx::Error> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
