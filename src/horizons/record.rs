//! # Horizons observer-table records
//!
//! A [`ReferenceRecord`] is one data line of a Horizons observer table, sliced at fixed
//! columns and converted to typed values:
//!
//! | Columns  | Content                      | Parsed with                   |
//! |----------|------------------------------|-------------------------------|
//! | `1..18`  | `YYYY-Mon-DD HH:MM` (UTC)    | [`horizons_date_to_epoch`]    |
//! | `23..34` | apparent RA `HH MM SS.ff`    | [`parse_ra`]                  |
//! | `35..46` | apparent Dec `sDD MM SS.f`   | [`parse_dec`]                 |
//! | `71..`   | angular diameter (arcsec)    | `f64::from_str`               |
//!
//! Slices running past the end of a short line are clamped, so a truncated line fails on the
//! first field it lacks rather than panicking.
use std::{
    ops::{Bound, RangeBounds},
    sync::Arc,
};

use hifitime::Epoch;
use thiserror::Error;

use crate::{
    angle::Angle,
    constants::{ArcSec, DATE_COLUMNS, DEC_COLUMNS, RA_COLUMNS, SIZE_COLUMNS},
    conversion::{parse_dec, parse_ra},
    time::horizons_date_to_epoch,
};

/// Field-level parsing errors for Horizons data lines.
///
/// Each variant carries the trimmed offending slice.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseRecordError {
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
    #[error("Invalid RA value: {0:?}")]
    InvalidRA(String),
    #[error("Invalid Dec value: {0:?}")]
    InvalidDec(String),
    #[error("Invalid angular size: {0:?}")]
    InvalidSize(String),
}

/// One reference position of a body, as published in the reference ephemeris.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRecord {
    /// Name of the target declared by the header preceding this record.
    pub body: Arc<str>,
    /// 1-based line number in the source file.
    pub line: usize,
    pub epoch: Epoch,
    pub ra: Angle,
    pub dec: Angle,
    pub size: ArcSec,
}

/// Extract a column slice, clamping both bounds to the line length.
///
/// Returns `None` when a bound falls inside a multi-byte character.
fn column<R: RangeBounds<usize>>(line: &str, range: R) -> Option<&str> {
    let len = line.len();
    let start = match range.start_bound() {
        Bound::Included(s) => (*s).min(len),
        Bound::Excluded(s) => (*s + 1).min(len),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(e) => (*e + 1).min(len),
        Bound::Excluded(e) => (*e).min(len),
        Bound::Unbounded => len,
    };
    line.get(start..end)
}

impl ReferenceRecord {
    /// Parse a single data line of a Horizons observer table.
    ///
    /// Arguments
    /// ---------
    /// * `body`: the target declared by the file header
    /// * `line_number`: 1-based position of the line, kept for diagnostics
    /// * `line`: the raw data line
    ///
    /// Return
    /// ------
    /// * the parsed record, or the first field that failed to parse
    ///
    /// The size column is parsed unconditionally: a blank or non-numeric value is an error even
    /// when the target has no angular size.
    pub fn from_horizons_line(
        body: Arc<str>,
        line_number: usize,
        line: &str,
    ) -> Result<Self, ParseRecordError> {
        // a misaligned field is reported with the whole line
        let whole = || line.trim().to_string();

        let date = column(line, DATE_COLUMNS)
            .ok_or_else(|| ParseRecordError::InvalidDate(whole()))?
            .trim();
        let epoch = horizons_date_to_epoch(date)
            .map_err(|_| ParseRecordError::InvalidDate(date.to_string()))?;

        let ra_field =
            column(line, RA_COLUMNS).ok_or_else(|| ParseRecordError::InvalidRA(whole()))?;
        let ra = parse_ra(ra_field)
            .ok_or_else(|| ParseRecordError::InvalidRA(ra_field.trim().to_string()))?;

        let dec_field =
            column(line, DEC_COLUMNS).ok_or_else(|| ParseRecordError::InvalidDec(whole()))?;
        let dec = parse_dec(dec_field)
            .ok_or_else(|| ParseRecordError::InvalidDec(dec_field.trim().to_string()))?;

        let size_field = column(line, SIZE_COLUMNS)
            .ok_or_else(|| ParseRecordError::InvalidSize(whole()))?
            .trim();
        let size = size_field
            .parse::<ArcSec>()
            .ok()
            .filter(|s| s.is_finite())
            .ok_or_else(|| ParseRecordError::InvalidSize(size_field.to_string()))?;

        Ok(ReferenceRecord {
            body,
            line: line_number,
            epoch,
            ra,
            dec,
            size,
        })
    }
}
