//! Batch import flows: spreadsheet-derived JSON records into database rows.
//!
//! Records are processed strictly in input order with per-record
//! isolation: a malformed or rejected record is counted and logged, and
//! the batch continues. Each record's writes commit independently, so a
//! failure never rolls back earlier records.

use sqlx::PgPool;

use garten_core::import::{
    map_planting_record, map_variety_record, ImportSummary, MappedVariety,
    RawPlantingRecord, RawVarietyRecord, SkipReason,
};
use garten_db::models::planting_log::CreatePlantingLogEntry;
use garten_db::models::variety::CreateVariety;
use garten_db::repositories::{CategoryRepo, PlantingLogRepo, SpeciesRepo, VarietyRepo};

/// Import variety records, upserting by name.
///
/// Categories and species are created on demand. A record without a name
/// or category is skipped; everything else is normalized and written,
/// updating an existing variety with the same name in place.
pub async fn import_varieties(pool: &PgPool, records: &[RawVarietyRecord]) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for record in records {
        let mapped = match map_variety_record(record) {
            Ok(mapped) => mapped,
            Err(reason) => {
                tracing::warn!(%reason, "Skipping variety record");
                summary.record_skip(reason);
                continue;
            }
        };

        match upsert_variety(pool, &mapped).await {
            Ok(true) => {
                tracing::debug!(name = %mapped.name, "Variety created");
                summary.record_created();
            }
            Ok(false) => {
                tracing::debug!(name = %mapped.name, "Variety updated");
                summary.record_updated();
            }
            Err(err) => {
                let reason = SkipReason::Failed {
                    name: mapped.name.clone(),
                    message: err.to_string(),
                };
                tracing::error!(%reason, "Skipping variety record");
                summary.record_skip(reason);
            }
        }
    }

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        "Variety import finished"
    );
    summary
}

/// Resolve references and upsert one mapped variety. Returns whether a
/// new row was created.
async fn upsert_variety(pool: &PgPool, mapped: &MappedVariety) -> Result<bool, sqlx::Error> {
    let category = CategoryRepo::get_or_create(pool, &mapped.category_name).await?;
    let species_id = match &mapped.species_name {
        Some(name) => Some(SpeciesRepo::get_or_create(pool, name).await?.id),
        None => None,
    };

    let input = CreateVariety {
        name: mapped.name.clone(),
        category_id: category.id,
        species_id,
        sowing_start_month: mapped.sowing_start_month,
        sowing_end_month: mapped.sowing_end_month,
        info_url: Some(mapped.info_url.clone()),
        stock_quantity: Some(mapped.stock_quantity),
        stock_unit: Some(mapped.stock_unit.as_str().to_string()),
    };

    let (_, created) = VarietyRepo::upsert_by_name(pool, &input).await?;
    Ok(created)
}

/// Import planting-log records, creating entries if absent.
///
/// The variety is resolved by case-insensitive exact name; with multiple
/// matches the lowest-id row wins (logged as a warning). The entry year
/// is derived from the sowing date by the repository. Re-running the
/// same input creates nothing new: (variety, year, sowing date) is the
/// idempotency key and existing entries are left untouched.
pub async fn import_planting_log(pool: &PgPool, records: &[RawPlantingRecord]) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for record in records {
        let mapped = match map_planting_record(record) {
            Ok(mapped) => mapped,
            Err(reason) => {
                tracing::warn!(%reason, "Skipping planting-log record");
                summary.record_skip(reason);
                continue;
            }
        };

        let matches = match VarietyRepo::list_by_name_ci(pool, &mapped.variety_name).await {
            Ok(matches) => matches,
            Err(err) => {
                let reason = SkipReason::Failed {
                    name: mapped.variety_name.clone(),
                    message: err.to_string(),
                };
                tracing::error!(%reason, "Skipping planting-log record");
                summary.record_skip(reason);
                continue;
            }
        };

        let variety = match matches.first() {
            Some(variety) => variety,
            None => {
                let reason = SkipReason::UnknownVariety {
                    name: mapped.variety_name.clone(),
                    raw: mapped.variety_raw.clone(),
                };
                tracing::warn!(%reason, "Skipping planting-log record");
                summary.record_skip(reason);
                continue;
            }
        };
        if matches.len() > 1 {
            tracing::warn!(
                name = %mapped.variety_name,
                matches = matches.len(),
                variety_id = variety.id,
                "Multiple varieties match; taking the lowest id"
            );
        }

        let input = CreatePlantingLogEntry {
            variety_id: variety.id,
            sowing_date: mapped.sowing_date,
            seed_count: Some(mapped.seed_count),
            sowing_method: Some(mapped.sowing_method.as_str().to_string()),
            container: Some(mapped.container.clone()),
            transplant_date: mapped.transplant_date,
            planting_date: None,
            description: Some(mapped.description.clone()),
            latitude: None,
            longitude: None,
            gps_accuracy_m: None,
        };

        match PlantingLogRepo::create_if_absent(pool, &input).await {
            Ok(Some(entry)) => {
                tracing::debug!(
                    name = %mapped.variety_name,
                    year = entry.year,
                    sowing_date = %entry.sowing_date,
                    "Planting-log entry created"
                );
                summary.record_created();
            }
            Ok(None) => {
                tracing::debug!(
                    name = %mapped.variety_name,
                    sowing_date = %mapped.sowing_date,
                    "Planting-log entry already exists; left untouched"
                );
                summary.record_unchanged();
            }
            Err(err) => {
                let reason = SkipReason::Failed {
                    name: mapped.variety_name.clone(),
                    message: err.to_string(),
                };
                tracing::error!(%reason, "Skipping planting-log record");
                summary.record_skip(reason);
            }
        }
    }

    tracing::info!(
        created = summary.created,
        unchanged = summary.unchanged,
        skipped = summary.skipped,
        "Planting-log import finished"
    );
    summary
}
