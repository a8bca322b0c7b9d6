//! # Continuous angles
//!
//! [`Angle`] stores an angle in **radians** and is the single representation used for
//! reference and computed coordinates. Subtracting two angles yields the **shortest signed
//! difference** in `(-π, π]`, so comparisons across the 0h/24h seam of right ascension need no
//! special casing in the comparison logic.
//!
//! Formatting helpers render the value back in sexagesimal form, either as hours
//! (`23:59:58.00`) or as degrees (`-5:12:30.0`), which is what diagnostics print.
use std::{f64::consts::PI, fmt, ops::Sub};

use crate::constants::{ArcSec, Degree, Hour, Radian, DPI, RADEG, RADH, RADSEC};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Angle(Radian);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn from_radians(rad: Radian) -> Self {
        Angle(rad)
    }

    pub fn from_hours(hours: Hour) -> Self {
        Angle(hours * RADH)
    }

    pub fn from_degrees(deg: Degree) -> Self {
        Angle(deg * RADEG)
    }

    pub fn from_arcsec(arcsec: ArcSec) -> Self {
        Angle(arcsec * RADSEC)
    }

    pub fn radians(self) -> Radian {
        self.0
    }

    pub fn hours(self) -> Hour {
        self.0 / RADH
    }

    pub fn degrees(self) -> Degree {
        self.0 / RADEG
    }

    pub fn arcsec(self) -> ArcSec {
        self.0 / RADSEC
    }

    pub fn abs(self) -> Self {
        Angle(self.0.abs())
    }

    /// Bring the angle into `(-π, π]`.
    pub fn wrapped(self) -> Self {
        let mut r = self.0.rem_euclid(DPI);
        if r > PI {
            r -= DPI;
        }
        Angle(r)
    }

    /// Sexagesimal rendering in hours, seconds of time to two decimals.
    pub fn fmt_hours(self) -> String {
        sexagesimal(self.hours(), 2)
    }

    /// Sexagesimal rendering in degrees, arcseconds to one decimal.
    pub fn fmt_degrees(self) -> String {
        sexagesimal(self.degrees(), 1)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0).wrapped()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fmt_degrees())
    }
}

fn sexagesimal(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let scale = 10f64.powi(decimals as i32);

    // round once on the smallest unit so carries propagate to minutes and units
    let ticks = (value.abs() * 3600.0 * scale).round() as u64;
    let per_minute = (60.0 * scale) as u64;
    let per_unit = 60 * per_minute;

    let units = ticks / per_unit;
    let minutes = (ticks % per_unit) / per_minute;
    let seconds = (ticks % per_minute) as f64 / scale;
    let width = decimals + 3;

    format!("{sign}{units}:{minutes:02}:{seconds:0width$.decimals$}")
}
