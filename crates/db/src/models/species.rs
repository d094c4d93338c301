//! Species model: biological species grouping, finer than category.

use garten_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `species` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Species {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new species.
#[derive(Debug, Deserialize)]
pub struct CreateSpecies {
    pub name: String,
}

/// DTO for updating a species.
#[derive(Debug, Deserialize)]
pub struct UpdateSpecies {
    pub name: Option<String>,
}
