//! Field normalizer for spreadsheet-derived text.
//!
//! The source spreadsheets use German formatting throughout: dates like
//! `"15. Februar 2025"`, decimal quantities like `"1.234,56"`, month ranges
//! joined by an arrow glyph, and single-letter unit shorthands. This module
//! has zero external dependencies (no DB, no async, no I/O) and converts
//! that raw text into canonical typed values.
//!
//! Every function here is total: malformed input yields a documented
//! default (`None`, zero, or an empty string), never a panic or an error.
//! Record-level decisions (skip vs. store) belong to the importer.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed German month-name table. A fixed table instead of locale-based
/// parsing keeps the result independent of the host environment.
pub const GERMAN_MONTHS: [(&str, u32); 12] = [
    ("Januar", 1),
    ("Februar", 2),
    ("März", 3),
    ("April", 4),
    ("Mai", 5),
    ("Juni", 6),
    ("Juli", 7),
    ("August", 8),
    ("September", 9),
    ("Oktober", 10),
    ("November", 11),
    ("Dezember", 12),
];

/// Separator between the two phrases of a month range.
pub const RANGE_ARROW: char = '→';

/// Maximum stored length of an info URL, in characters.
pub const MAX_INFO_URL_CHARS: usize = 200;

/// Maximum stored length of the raising-container field, in characters.
pub const MAX_CONTAINER_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Stock unit
// ---------------------------------------------------------------------------

/// Unit a variety's seed stock is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockUnit {
    /// Individual seeds (`ANZ`).
    Count,
    /// Weight in grams (`G`).
    Grams,
}

impl StockUnit {
    /// Return the unit code as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "ANZ",
            Self::Grams => "G",
        }
    }

    /// Parse a canonical unit code. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ANZ" => Some(Self::Count),
            "G" => Some(Self::Grams),
            _ => None,
        }
    }

    /// All valid unit codes.
    pub const ALL: &'static [&'static str] = &["ANZ", "G"];
}

impl std::fmt::Display for StockUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sowing method
// ---------------------------------------------------------------------------

/// How a planting was sown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SowingMethod {
    /// Raised indoors in containers (`ANZUCHT`).
    IndoorRaised,
    /// Sown directly in the field (`FREILAND`).
    DirectField,
}

impl SowingMethod {
    /// Return the method code as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndoorRaised => "ANZUCHT",
            Self::DirectField => "FREILAND",
        }
    }

    /// Parse a canonical method code. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ANZUCHT" => Some(Self::IndoorRaised),
            "FREILAND" => Some(Self::DirectField),
            _ => None,
        }
    }

    /// All valid method codes.
    pub const ALL: &'static [&'static str] = &["ANZUCHT", "FREILAND"];
}

impl std::fmt::Display for SowingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Dates and month ranges
// ---------------------------------------------------------------------------

/// Parse a date written as `"<day>. <German month name> <year>"`, e.g.
/// `"15. Februar 2025"`.
///
/// The trimmed input must split on single spaces into exactly three tokens.
/// Periods are stripped from the day token, the month name is looked up in
/// [`GERMAN_MONTHS`], and the result must be a valid calendar date.
/// Returns `None` for anything else.
pub fn parse_german_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parts: Vec<&str> = trimmed.split(' ').collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].replace('.', "").parse().ok()?;
    let month = GERMAN_MONTHS
        .iter()
        .find(|(name, _)| *name == parts[1])
        .map(|(_, number)| *number)?;
    let year: i32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract a `(start, end)` month pair from a sowing-window phrase.
///
/// The input is either a single German date phrase or two phrases separated
/// by `→`. With the arrow, exactly two parts are required; otherwise both
/// months come back as `None`. A single phrase supplies both sides. Each
/// side is parsed independently via [`parse_german_date`], keeping only the
/// month; a side that fails to parse yields `None` for that side.
pub fn extract_month_range(text: &str) -> (Option<i16>, Option<i16>) {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return (None, None);
    }

    let (start_str, end_str) = if cleaned.contains(RANGE_ARROW) {
        let parts: Vec<&str> = cleaned.split(RANGE_ARROW).map(str::trim).collect();
        if parts.len() != 2 {
            return (None, None);
        }
        (parts[0], parts[1])
    } else {
        (cleaned, cleaned)
    };

    let month_of = |s: &str| parse_german_date(s).map(|d| d.month() as i16);
    (month_of(start_str), month_of(end_str))
}

// ---------------------------------------------------------------------------
// Names and free text
// ---------------------------------------------------------------------------

/// Strip a trailing parenthesized annotation from a variety name:
/// `"Habanero (https://…)"` becomes `"Habanero"`.
pub fn extract_variety_name(text: &str) -> String {
    match text.find('(') {
        Some(idx) => text[..idx].trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Truncate a string to at most `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

/// Parse a stock quantity written in German numeric formatting.
///
/// Ordinary and non-breaking spaces are stripped. When a comma is present
/// it is the decimal separator; any periods are then thousands separators
/// and are removed first (`"1.234,56"` parses as 1234.56). Plain values
/// like `"12.5"` pass through unchanged. Anything unparseable, including
/// the empty string, yields zero.
pub fn parse_stock_quantity(text: &str) -> Decimal {
    let mut s: String = text
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{00A0}')
        .collect();

    if s.contains(',') {
        if s.contains('.') {
            s = s.replace('.', "");
        }
        s = s.replace(',', ".");
    }

    s.parse().unwrap_or(Decimal::ZERO)
}

/// Stock quantity from a loosely-typed JSON value.
///
/// Numbers are taken directly; strings go through
/// [`parse_stock_quantity`]; null and everything else is zero.
pub fn stock_quantity_from_value(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::Number(n) => n.to_string().parse().unwrap_or(Decimal::ZERO),
        serde_json::Value::String(s) => parse_stock_quantity(s),
        _ => Decimal::ZERO,
    }
}

/// Seed count from a loosely-typed JSON value. Non-numeric, absent, and
/// negative inputs all default to zero.
pub fn seed_count_from_value(value: &serde_json::Value) -> i32 {
    let count = match value {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0
            } else {
                trimmed.parse().unwrap_or(0)
            }
        }
        _ => 0,
    };
    count.clamp(0, i32::MAX as i64) as i32
}

// ---------------------------------------------------------------------------
// Units and methods
// ---------------------------------------------------------------------------

/// Normalize a raw unit string to a [`StockUnit`].
///
/// Accepts the single-character shorthands `"g"` (grams) and `"k"`
/// (count — the legacy shorthand is carried over from the source data
/// as-is) plus the canonical codes. Anything else defaults to count.
pub fn parse_unit(text: &str) -> StockUnit {
    match text.trim() {
        "g" => StockUnit::Grams,
        "k" => StockUnit::Count,
        other => StockUnit::parse(other).unwrap_or(StockUnit::Count),
    }
}

/// Normalize a raw sowing-method string to a [`SowingMethod`].
///
/// Any value whose lower-cased form contains `"freiland"` is direct-field
/// sowing; everything else (including the canonical `"ANZUCHT"` and the
/// German word `"Anzucht"`) is indoor-raised.
pub fn parse_sowing_method(text: &str) -> SowingMethod {
    if text.trim().to_lowercase().contains("freiland") {
        SowingMethod::DirectField
    } else {
        SowingMethod::IndoorRaised
    }
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Return the trimmed URL if it starts with `http://` or `https://` and is
/// at most [`MAX_INFO_URL_CHARS`] characters; otherwise the empty string.
pub fn sanitize_url(text: &str) -> String {
    let url = text.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return String::new();
    }
    if url.chars().count() > MAX_INFO_URL_CHARS {
        return String::new();
    }
    url.to_string()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an optional month number (1–12).
pub fn validate_month(month: Option<i16>) -> Result<(), String> {
    match month {
        Some(m) if !(1..=12).contains(&m) => {
            Err(format!("Month must be between 1 and 12, got {m}"))
        }
        _ => Ok(()),
    }
}

/// Validate a unit code string as stored in the database.
pub fn validate_unit(unit: &str) -> Result<(), String> {
    if StockUnit::parse(unit).is_some() {
        Ok(())
    } else {
        Err(format!(
            "Invalid stock unit '{}'. Must be one of: {}",
            unit,
            StockUnit::ALL.join(", ")
        ))
    }
}

/// Validate a sowing-method code string as stored in the database.
pub fn validate_sowing_method(method: &str) -> Result<(), String> {
    if SowingMethod::parse(method).is_some() {
        Ok(())
    } else {
        Err(format!(
            "Invalid sowing method '{}'. Must be one of: {}",
            method,
            SowingMethod::ALL.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
