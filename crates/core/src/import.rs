//! Raw-record mapping for the spreadsheet-JSON batch importer.
//!
//! The input files are JSON arrays of objects with loosely-named German
//! keys. No key is guaranteed to be present and values switch freely
//! between strings and numbers, so the record structs keep everything
//! optional and loosely typed. This module maps a raw record into a typed
//! "new row" value or a [`SkipReason`] — pure data in, pure data out; the
//! database half of the importer lives in `garten-importer`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::normalize::{
    extract_month_range, extract_variety_name, parse_german_date, parse_sowing_method,
    parse_unit, sanitize_url, seed_count_from_value, stock_quantity_from_value,
    truncate_chars, SowingMethod, StockUnit, MAX_CONTAINER_CHARS,
};

// ---------------------------------------------------------------------------
// Raw records
// ---------------------------------------------------------------------------

/// One row of the variety source file (`Sorte.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVarietyRecord {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Kategorie", default)]
    pub category: Option<String>,
    #[serde(rename = "Art", default)]
    pub species: Option<String>,
    /// Sowing window, e.g. `"1. März 2025 → 30. April 2025"`.
    #[serde(rename = "Anzucht", default)]
    pub sowing_window: Option<String>,
    #[serde(rename = "URL", default)]
    pub info_url: Option<String>,
    /// Stock quantity; the spreadsheets emit both strings and numbers.
    #[serde(rename = "Bestand", default)]
    pub stock: serde_json::Value,
    #[serde(rename = "Einheit", default)]
    pub unit: Option<String>,
}

/// One row of the planting-log source file (`Pflanzplan_<year>.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlantingRecord {
    /// Source row id, kept in the imported description for traceability.
    #[serde(rename = "ID", default)]
    pub source_id: serde_json::Value,
    /// Variety name, possibly annotated: `"Habanero (https://…)"`.
    #[serde(rename = "Sorten", default)]
    pub variety: Option<String>,
    /// Sowing date as a German date phrase.
    #[serde(rename = "Aussaat", default)]
    pub sowing_date: Option<String>,
    /// Seed count; strings and numbers both occur.
    #[serde(rename = "Anzahl", default)]
    pub seed_count: serde_json::Value,
    /// Raw sowing method, e.g. `"Anzucht"` or `"Freiland"`.
    #[serde(rename = "wie?", default)]
    pub method: Option<String>,
    /// Raising container description.
    #[serde(rename = "wo?", default)]
    pub container: Option<String>,
    /// Transplant date as a German date phrase.
    #[serde(rename = "pikiert", default)]
    pub transplant_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Skip reasons and run accounting
// ---------------------------------------------------------------------------

/// Why a source record was skipped. Retains enough raw context to diagnose
/// the source row later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record has no usable name field.
    MissingName,
    /// The variety record has no category, which is mandatory.
    MissingCategory { name: String },
    /// No variety matches the extracted name.
    UnknownVariety { name: String, raw: String },
    /// The sowing date is absent or unparseable; it is required.
    MissingSowingDate { name: String },
    /// The storage layer rejected the row; the batch continues.
    Failed { name: String, message: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "record without a name"),
            Self::MissingCategory { name } => {
                write!(f, "'{name}': no category given")
            }
            Self::UnknownVariety { name, raw } => {
                write!(f, "variety not found: '{name}' (raw: {raw})")
            }
            Self::MissingSowingDate { name } => {
                write!(f, "'{name}': no valid sowing date")
            }
            Self::Failed { name, message } => {
                write!(f, "'{name}': {message}")
            }
        }
    }
}

/// Created/updated/skipped accounting for one import run. Skip reasons are
/// retained so the run report can list them, not just count them.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    /// Records whose idempotency key already existed; the stored row is
    /// left untouched.
    pub unchanged: usize,
    pub skipped: usize,
    pub skip_reasons: Vec<SkipReason>,
}

impl ImportSummary {
    pub fn record_created(&mut self) {
        self.created += 1;
    }

    pub fn record_updated(&mut self) {
        self.updated += 1;
    }

    pub fn record_unchanged(&mut self) {
        self.unchanged += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        self.skip_reasons.push(reason);
    }

    /// Total number of records accounted for.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.skipped
    }
}

// ---------------------------------------------------------------------------
// Mapped records
// ---------------------------------------------------------------------------

/// Canonical variety fields produced from a raw record. Category and
/// species stay as names here; the importer resolves them to rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedVariety {
    pub name: String,
    pub category_name: String,
    pub species_name: Option<String>,
    pub sowing_start_month: Option<i16>,
    pub sowing_end_month: Option<i16>,
    pub info_url: String,
    pub stock_quantity: Decimal,
    pub stock_unit: StockUnit,
}

/// Canonical planting-log fields produced from a raw record. The variety
/// stays as a name here; the year is derived from the sowing date by the
/// persistence layer, never carried separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedPlanting {
    pub variety_name: String,
    /// Original value of the annotated variety field, for skip diagnostics.
    pub variety_raw: String,
    pub sowing_date: NaiveDate,
    pub seed_count: i32,
    pub sowing_method: SowingMethod,
    pub container: String,
    pub transplant_date: Option<NaiveDate>,
    pub description: String,
}

/// Map a raw variety record to canonical fields, or a reason to skip it.
pub fn map_variety_record(record: &RawVarietyRecord) -> Result<MappedVariety, SkipReason> {
    let name = record.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(SkipReason::MissingName);
    }

    let category_name = record.category.as_deref().unwrap_or("").trim().to_string();
    if category_name.is_empty() {
        return Err(SkipReason::MissingCategory { name });
    }

    let species_name = record
        .species
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let (sowing_start_month, sowing_end_month) =
        extract_month_range(record.sowing_window.as_deref().unwrap_or(""));

    Ok(MappedVariety {
        name,
        category_name,
        species_name,
        sowing_start_month,
        sowing_end_month,
        info_url: sanitize_url(record.info_url.as_deref().unwrap_or("")),
        stock_quantity: stock_quantity_from_value(&record.stock),
        stock_unit: parse_unit(record.unit.as_deref().unwrap_or("")),
    })
}

/// Map a raw planting-log record to canonical fields, or a reason to skip
/// it. Variety resolution against the database happens in the importer;
/// everything decidable from the record alone is decided here.
pub fn map_planting_record(record: &RawPlantingRecord) -> Result<MappedPlanting, SkipReason> {
    let variety_raw = record.variety.as_deref().unwrap_or("").to_string();
    let variety_name = extract_variety_name(&variety_raw);
    if variety_name.is_empty() {
        return Err(SkipReason::MissingName);
    }

    let sowing_date = parse_german_date(record.sowing_date.as_deref().unwrap_or("")).ok_or(
        SkipReason::MissingSowingDate {
            name: variety_name.clone(),
        },
    )?;

    Ok(MappedPlanting {
        description: format!("Importiert aus JSON. ID: {}", render_source_id(&record.source_id)),
        variety_name,
        variety_raw,
        sowing_date,
        seed_count: seed_count_from_value(&record.seed_count),
        sowing_method: parse_sowing_method(record.method.as_deref().unwrap_or("")),
        container: truncate_chars(
            record.container.as_deref().unwrap_or(""),
            MAX_CONTAINER_CHARS,
        ),
        transplant_date: record
            .transplant_date
            .as_deref()
            .and_then(parse_german_date),
    })
}

/// Render a loosely-typed source id for the description field.
fn render_source_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "?".to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn variety_record(json: serde_json::Value) -> RawVarietyRecord {
        serde_json::from_value(json).unwrap()
    }

    fn planting_record(json: serde_json::Value) -> RawPlantingRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn maps_full_variety_record() {
        let record = variety_record(serde_json::json!({
            "Name": "Tomate Rot",
            "Kategorie": "Gemüse",
            "Art": "Tomate",
            "Anzucht": "1. März 2025 → 30. April 2025",
            "URL": "https://example.com/tomate",
            "Bestand": "1,5",
            "Einheit": "g"
        }));

        let mapped = map_variety_record(&record).unwrap();
        assert_eq!(mapped.name, "Tomate Rot");
        assert_eq!(mapped.category_name, "Gemüse");
        assert_eq!(mapped.species_name.as_deref(), Some("Tomate"));
        assert_eq!(mapped.sowing_start_month, Some(3));
        assert_eq!(mapped.sowing_end_month, Some(4));
        assert_eq!(mapped.info_url, "https://example.com/tomate");
        assert_eq!(mapped.stock_quantity, "1.5".parse().unwrap());
        assert_eq!(mapped.stock_unit, StockUnit::Grams);
    }

    #[test]
    fn variety_record_requires_name() {
        let record = variety_record(serde_json::json!({ "Kategorie": "Gemüse" }));
        assert_eq!(map_variety_record(&record), Err(SkipReason::MissingName));

        let record = variety_record(serde_json::json!({ "Name": "  ", "Kategorie": "Gemüse" }));
        assert_eq!(map_variety_record(&record), Err(SkipReason::MissingName));
    }

    #[test]
    fn variety_record_requires_category() {
        let record = variety_record(serde_json::json!({ "Name": "Tomate Rot" }));
        assert_eq!(
            map_variety_record(&record),
            Err(SkipReason::MissingCategory {
                name: "Tomate Rot".to_string()
            })
        );
    }

    #[test]
    fn variety_record_defaults_for_missing_optionals() {
        let record = variety_record(serde_json::json!({
            "Name": "Tomate Rot",
            "Kategorie": "Gemüse"
        }));

        let mapped = map_variety_record(&record).unwrap();
        assert_eq!(mapped.species_name, None);
        assert_eq!(mapped.sowing_start_month, None);
        assert_eq!(mapped.sowing_end_month, None);
        assert_eq!(mapped.info_url, "");
        assert_eq!(mapped.stock_quantity, Decimal::ZERO);
        assert_eq!(mapped.stock_unit, StockUnit::Count);
    }

    #[test]
    fn variety_record_clears_bad_urls() {
        let record = variety_record(serde_json::json!({
            "Name": "Tomate Rot",
            "Kategorie": "Gemüse",
            "URL": "www.example.com"
        }));
        assert_eq!(map_variety_record(&record).unwrap().info_url, "");
    }

    #[test]
    fn maps_full_planting_record() {
        let record = planting_record(serde_json::json!({
            "ID": 17,
            "Sorten": "Habanero (https://example.com)",
            "Aussaat": "15. Februar 2025",
            "Anzahl": "12",
            "wie?": "Freiland",
            "wo?": "Beet 3",
            "pikiert": "1. April 2025"
        }));

        let mapped = map_planting_record(&record).unwrap();
        assert_eq!(mapped.variety_name, "Habanero");
        assert_eq!(
            mapped.sowing_date,
            NaiveDate::from_ymd_opt(2025, 2, 15).unwrap()
        );
        assert_eq!(mapped.seed_count, 12);
        assert_eq!(mapped.sowing_method, SowingMethod::DirectField);
        assert_eq!(mapped.container, "Beet 3");
        assert_eq!(
            mapped.transplant_date,
            NaiveDate::from_ymd_opt(2025, 4, 1)
        );
        assert_eq!(mapped.description, "Importiert aus JSON. ID: 17");
    }

    #[test]
    fn planting_record_requires_variety_name() {
        let record = planting_record(serde_json::json!({ "Aussaat": "15. Februar 2025" }));
        assert_eq!(map_planting_record(&record), Err(SkipReason::MissingName));
    }

    #[test]
    fn planting_record_requires_parseable_sowing_date() {
        let record = planting_record(serde_json::json!({
            "Sorten": "Habanero",
            "Aussaat": "irgendwann im Frühling"
        }));
        assert_eq!(
            map_planting_record(&record),
            Err(SkipReason::MissingSowingDate {
                name: "Habanero".to_string()
            })
        );

        let record = planting_record(serde_json::json!({ "Sorten": "Habanero" }));
        assert!(matches!(
            map_planting_record(&record),
            Err(SkipReason::MissingSowingDate { .. })
        ));
    }

    #[test]
    fn planting_record_defaults() {
        let record = planting_record(serde_json::json!({
            "Sorten": "Habanero",
            "Aussaat": "15. Februar 2025"
        }));

        let mapped = map_planting_record(&record).unwrap();
        assert_eq!(mapped.seed_count, 0);
        assert_eq!(mapped.sowing_method, SowingMethod::IndoorRaised);
        assert_eq!(mapped.container, "");
        assert_eq!(mapped.transplant_date, None);
        assert_eq!(mapped.description, "Importiert aus JSON. ID: ?");
    }

    #[test]
    fn planting_record_truncates_container() {
        let record = planting_record(serde_json::json!({
            "Sorten": "Habanero",
            "Aussaat": "15. Februar 2025",
            "wo?": "B".repeat(150)
        }));
        assert_eq!(
            map_planting_record(&record).unwrap().container.chars().count(),
            MAX_CONTAINER_CHARS
        );
    }

    #[test]
    fn summary_accounting() {
        let mut summary = ImportSummary::default();
        summary.record_created();
        summary.record_created();
        summary.record_updated();
        summary.record_skip(SkipReason::MissingName);

        assert_eq!(summary.created, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.skip_reasons.len(), 1);
    }
}
