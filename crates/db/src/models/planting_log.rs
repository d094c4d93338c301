//! Planting-log model: one year's sowing/planting record for a variety.

use chrono::NaiveDate;
use garten_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `planting_log_entries` table, with the variety name
/// joined in for API responses.
///
/// `year` is derived from `sowing_date` on every write; it never comes
/// from a client or an import record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlantingLogEntry {
    pub id: DbId,
    pub variety_id: DbId,
    pub variety_name: String,
    pub year: i16,
    pub sowing_date: NaiveDate,
    pub seed_count: i32,
    pub sowing_method: String,
    pub container: String,
    pub transplant_date: Option<NaiveDate>,
    pub planting_date: Option<NaiveDate>,
    pub description: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub gps_accuracy_m: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new planting-log entry. Carries no `year` field;
/// the year is always recomputed from `sowing_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlantingLogEntry {
    pub variety_id: DbId,
    pub sowing_date: NaiveDate,
    pub seed_count: Option<i32>,
    pub sowing_method: Option<String>,
    pub container: Option<String>,
    pub transplant_date: Option<NaiveDate>,
    pub planting_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub gps_accuracy_m: Option<Decimal>,
}

/// DTO for updating a planting-log entry. Only non-`None` fields are
/// applied; changing `sowing_date` re-derives `year`. As with
/// [`UpdateVariety`](super::variety::UpdateVariety), the nullable date and
/// GPS columns cannot be cleared back to NULL through this DTO.
#[derive(Debug, Deserialize)]
pub struct UpdatePlantingLogEntry {
    pub variety_id: Option<DbId>,
    pub sowing_date: Option<NaiveDate>,
    pub seed_count: Option<i32>,
    pub sowing_method: Option<String>,
    pub container: Option<String>,
    pub transplant_date: Option<NaiveDate>,
    pub planting_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub gps_accuracy_m: Option<Decimal>,
}

/// Filters for listing planting-log entries.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlantingLogFilter {
    pub year: Option<i16>,
    pub category_id: Option<DbId>,
    pub variety_id: Option<DbId>,
    pub sort: Option<String>,
}
