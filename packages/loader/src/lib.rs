#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CSV crash record loader.
//!
//! Reads a tabular crash dataset, drops rows without usable coordinates,
//! and coerces the hour and injury columns to their numeric types under a
//! single [`CoercionPolicy`] applied uniformly to the whole file. A
//! [`cache::LoadCache`] memoizes the result keyed by the file's content
//! digest, so repeated loads of an unchanged file are free.

pub mod cache;

use crash_map_crash_models::CrashRecord;
use std::path::Path;

/// Required column headers, matched after trimming whitespace.
pub const COL_LATITUDE: &str = "LATITUDE";
pub const COL_LONGITUDE: &str = "LONGITUDE";
pub const COL_CRASH_HOUR: &str = "CRASH_HOUR";
pub const COL_INJURIES_FATAL: &str = "INJURIES_FATAL";
pub const COL_INJURIES_INCAPACITATING: &str = "INJURIES_INCAPACITATING";
pub const COL_INJURIES_NON_INCAPACITATING: &str = "INJURIES_NON_INCAPACITATING";

/// Errors that can occur while loading crash records.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Source file missing or unreadable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV structure.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("missing required column: {column}")]
    MissingColumn {
        /// Name of the absent column.
        column: &'static str,
    },

    /// A field could not be coerced to its numeric type under
    /// [`CoercionPolicy::FailFast`].
    #[error("row {line}: cannot parse {column} value '{value}'")]
    Coercion {
        /// 1-based line number in the source file.
        line: u64,
        /// Column whose value failed to parse.
        column: &'static str,
        /// The offending raw value.
        value: String,
    },
}

/// How to handle a row whose hour or injury fields cannot be parsed.
///
/// Chosen once per load and applied uniformly; there is no per-row
/// fallback. Rows with missing coordinates are always dropped regardless
/// of policy, since a record without a location cannot be plotted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Abort the whole load on the first unparseable field.
    FailFast,
    /// Skip the offending row and keep loading.
    #[default]
    DropRow,
}

/// Resolved indices of the required columns in the header row.
struct ColumnIndices {
    latitude: usize,
    longitude: usize,
    crash_hour: usize,
    injuries_fatal: usize,
    injuries_incapacitating: usize,
    injuries_non_incapacitating: usize,
}

impl ColumnIndices {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(LoadError::MissingColumn { column })
        };

        Ok(Self {
            latitude: find(COL_LATITUDE)?,
            longitude: find(COL_LONGITUDE)?,
            crash_hour: find(COL_CRASH_HOUR)?,
            injuries_fatal: find(COL_INJURIES_FATAL)?,
            injuries_incapacitating: find(COL_INJURIES_INCAPACITATING)?,
            injuries_non_incapacitating: find(COL_INJURIES_NON_INCAPACITATING)?,
        })
    }
}

/// Returns the trimmed field at `idx`, or `""` for a short row.
fn field(row: &csv::StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("").trim()
}

/// Loads crash records from the CSV file at `path`.
///
/// Rows with a missing latitude or longitude are dropped. Surviving rows
/// are coerced to [`CrashRecord`] under the given policy. Source order is
/// preserved and duplicates are kept.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing or unreadable, a required
/// column is absent, or (under [`CoercionPolicy::FailFast`]) a field fails
/// to parse.
pub fn load_records(path: &Path, policy: CoercionPolicy) -> Result<Vec<CrashRecord>, LoadError> {
    let bytes = std::fs::read(path)?;
    parse_records(&bytes, policy)
}

/// Parses crash records from raw CSV bytes. See [`load_records`].
///
/// # Errors
///
/// Returns [`LoadError`] on malformed CSV, a missing required column, or a
/// coercion failure under [`CoercionPolicy::FailFast`].
pub fn parse_records(bytes: &[u8], policy: CoercionPolicy) -> Result<Vec<CrashRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let indices = ColumnIndices::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    let mut dropped_coords: u64 = 0;
    let mut dropped_coercion: u64 = 0;

    for result in reader.records() {
        let row = result?;
        let line = row.position().map_or(0, csv::Position::line);

        let lat_str = field(&row, indices.latitude);
        let lng_str = field(&row, indices.longitude);

        // A record without a location cannot be plotted.
        if lat_str.is_empty() || lng_str.is_empty() {
            dropped_coords += 1;
            continue;
        }

        match parse_row(&indices, &row, line) {
            Ok(record) => records.push(record),
            Err(e) => match policy {
                CoercionPolicy::FailFast => return Err(e),
                CoercionPolicy::DropRow => {
                    log::debug!("dropping row: {e}");
                    dropped_coercion += 1;
                }
            },
        }
    }

    log::info!(
        "Loaded {} crash records ({dropped_coords} dropped for missing coordinates, \
         {dropped_coercion} dropped for unparseable fields)",
        records.len()
    );

    Ok(records)
}

/// Coerces one CSV row into a [`CrashRecord`].
fn parse_row(
    indices: &ColumnIndices,
    row: &csv::StringRecord,
    line: u64,
) -> Result<CrashRecord, LoadError> {
    let coercion = |column: &'static str, value: &str| LoadError::Coercion {
        line,
        column,
        value: value.to_owned(),
    };

    let parse_f64 = |column: &'static str, value: &str| {
        value.parse::<f64>().map_err(|_| coercion(column, value))
    };

    // Null injury counts are read as zero; non-empty garbage is a
    // coercion failure.
    let parse_count = |column: &'static str, value: &str| {
        if value.is_empty() {
            Ok(0)
        } else {
            value.parse::<u32>().map_err(|_| coercion(column, value))
        }
    };

    let latitude = parse_f64(COL_LATITUDE, field(row, indices.latitude))?;
    let longitude = parse_f64(COL_LONGITUDE, field(row, indices.longitude))?;

    let hour_str = field(row, indices.crash_hour);
    let crash_hour = hour_str
        .parse::<u8>()
        .ok()
        .filter(|h| *h <= 23)
        .ok_or_else(|| coercion(COL_CRASH_HOUR, hour_str))?;

    Ok(CrashRecord {
        latitude,
        longitude,
        crash_hour,
        injuries_fatal: parse_count(COL_INJURIES_FATAL, field(row, indices.injuries_fatal))?,
        injuries_incapacitating: parse_count(
            COL_INJURIES_INCAPACITATING,
            field(row, indices.injuries_incapacitating),
        )?,
        injuries_non_incapacitating: parse_count(
            COL_INJURIES_NON_INCAPACITATING,
            field(row, indices.injuries_non_incapacitating),
        )?,
    })
}
