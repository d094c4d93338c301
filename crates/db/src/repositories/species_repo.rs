//! Repository for the `species` table.

use garten_core::types::DbId;
use sqlx::PgPool;

use crate::models::species::{CreateSpecies, Species, UpdateSpecies};

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for species.
pub struct SpeciesRepo;

impl SpeciesRepo {
    /// Insert a new species, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSpecies) -> Result<Species, sqlx::Error> {
        let query = format!(
            "INSERT INTO species (name) VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Species>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a species by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Species>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM species WHERE id = $1");
        sqlx::query_as::<_, Species>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a species by name, creating it if absent.
    pub async fn get_or_create(pool: &PgPool, name: &str) -> Result<Species, sqlx::Error> {
        let query = format!(
            "INSERT INTO species (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Species>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List all species ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Species>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM species ORDER BY name");
        sqlx::query_as::<_, Species>(&query).fetch_all(pool).await
    }

    /// Update a species. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSpecies,
    ) -> Result<Option<Species>, sqlx::Error> {
        let query = format!(
            "UPDATE species SET
                name = COALESCE($2, name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Species>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a species by ID. Returns `true` if a row was deleted.
    /// Fails with a foreign-key violation while varieties reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM species WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
