use std::fmt;

use hifitime::Epoch;

use crate::angle::Angle;

/// A quantity compared between the engine and the reference ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    RightAscension,
    Declination,
    AngularSize,
}

impl Quantity {
    /// Render a raw value of this quantity (radians for angles, arcseconds for size).
    pub fn format_value(self, value: f64) -> String {
        match self {
            Quantity::RightAscension => Angle::from_radians(value).fmt_hours(),
            Quantity::Declination => Angle::from_radians(value).fmt_degrees(),
            Quantity::AngularSize => format!("{value:.3}\""),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::RightAscension => write!(f, "ra"),
            Quantity::Declination => write!(f, "dec"),
            Quantity::AngularSize => write!(f, "size"),
        }
    }
}

/// A computed value disagreeing with its reference beyond tolerance.
///
/// `computed` and `reference` are stored in the quantity's raw unit: radians for right
/// ascension and declination, arcseconds for angular size.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationMismatch {
    pub epoch: Epoch,
    pub body: String,
    /// Line of the reference record in its file.
    pub line: usize,
    pub quantity: Quantity,
    pub computed: f64,
    pub reference: f64,
}

impl fmt::Display for ValidationMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at {} (line {}), {} returns {}={} but the reference ephemeris insists that {}={}",
            self.epoch,
            self.line,
            self.body,
            self.quantity,
            self.quantity.format_value(self.computed),
            self.quantity,
            self.quantity.format_value(self.reference),
        )
    }
}
