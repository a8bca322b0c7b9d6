//! # Horizons reference ephemerides
//!
//! Reading of JPL Horizons observer tables used as ground truth:
//!
//! * [`record`] – fixed-column parsing of one data line into a [`ReferenceRecord`],
//! * [`reader`] – the streaming, state-machine driven [`ReferenceReader`],
//! * [`discovery`] – enumeration of reference files in a directory.
//!
//! [`ReferenceEphemeris`] is the eager counterpart of the reader: it collects a whole file
//! and checks every declared target against a [`BodyRegistry`].
pub mod discovery;
pub mod reader;
pub mod record;

use std::io::BufRead;

use camino::Utf8Path;

use crate::{engine::registry::BodyRegistry, ephemcheck_errors::EphemCheckError};
use reader::{ReferenceEvent, ReferenceReader};
use record::ReferenceRecord;

/// A fully parsed reference file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceEphemeris {
    /// Last target declared by the file, `None` if it has no header.
    pub target: Option<String>,
    pub records: Vec<ReferenceRecord>,
}

impl ReferenceEphemeris {
    /// Parse a reference ephemeris and check its targets against `registry`.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: the reference text
    /// * `registry`: the bodies the computation engine can resolve
    ///
    /// Return
    /// ----------
    /// * the target and all records, [`EphemCheckError::MissingBody`] as soon as a header
    ///   names an unknown body, or the first parsing error
    pub fn from_reader<R: BufRead>(
        reader: R,
        registry: &BodyRegistry,
    ) -> Result<Self, EphemCheckError> {
        let mut ephemeris = ReferenceEphemeris::default();

        for event in ReferenceReader::new(reader) {
            match event? {
                ReferenceEvent::Target(name) => {
                    if !registry.contains(&name) {
                        return Err(EphemCheckError::MissingBody(name.to_string()));
                    }
                    ephemeris.target = Some(name.to_string());
                }
                ReferenceEvent::Record(record) => ephemeris.records.push(record),
            }
        }

        Ok(ephemeris)
    }

    /// Same as [`ReferenceEphemeris::from_reader`], reading from a file.
    pub fn from_path(path: &Utf8Path, registry: &BodyRegistry) -> Result<Self, EphemCheckError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), registry)
    }
}
