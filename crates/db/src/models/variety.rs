//! Variety model: a named plant cultivar tracked for seed stock and
//! planting history.

use garten_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `varieties` table, with the category and species names
/// joined in for API responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Variety {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub category_name: String,
    pub species_id: Option<DbId>,
    pub species_name: Option<String>,
    pub sowing_start_month: Option<i16>,
    pub sowing_end_month: Option<i16>,
    pub info_url: String,
    pub stock_quantity: Decimal,
    pub stock_unit: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new variety.
///
/// `stock_quantity` defaults to 0 and `stock_unit` to `ANZ` when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVariety {
    pub name: String,
    pub category_id: DbId,
    pub species_id: Option<DbId>,
    pub sowing_start_month: Option<i16>,
    pub sowing_end_month: Option<i16>,
    pub info_url: Option<String>,
    pub stock_quantity: Option<Decimal>,
    pub stock_unit: Option<String>,
}

/// DTO for updating a variety. Only non-`None` fields are applied, so the
/// nullable columns (`species_id`, the sowing months) cannot be cleared
/// back to NULL through this DTO; `None` always means "leave unchanged".
/// The import upsert overwrites every field and is the path that clears
/// them.
#[derive(Debug, Deserialize)]
pub struct UpdateVariety {
    pub name: Option<String>,
    pub category_id: Option<DbId>,
    pub species_id: Option<DbId>,
    pub sowing_start_month: Option<i16>,
    pub sowing_end_month: Option<i16>,
    pub info_url: Option<String>,
    pub stock_quantity: Option<Decimal>,
    pub stock_unit: Option<String>,
}
