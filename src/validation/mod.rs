//! # Cross-validation of a computation engine against reference ephemerides
//!
//! For every [`ReferenceRecord`] of a reference file, the runner asks the resolved
//! [`BodyHandle`] for the apparent position at the record epoch and compares it with the
//! published values:
//!
//! | Quantity        | Compared on                          | Default fudge        |
//! |-----------------|--------------------------------------|----------------------|
//! | right ascension | shortest angular difference          | `0:00:02` degrees    |
//! | declination     | shortest angular difference          | `0:00:02` degrees    |
//! | angular size    | absolute difference (arcsec)         | `0.1`                |
//!
//! The size comparison only happens for [`SizeCapability::WithSize`] bodies.
//!
//! ## Failure model
//! -----------------
//! A file is a single trial. The first unknown body, malformed line, engine failure or
//! out-of-tolerance value aborts the pass and is returned as the file's
//! [`EphemCheckError`]; there is no retry and no partial result. Batches over many files
//! live in [`batch`], where each file's outcome is kept independently.
//!
//! ## Example
//! -----------------
//! ```rust,no_run
//! use camino::Utf8Path;
//! use ephemcheck::engine::registry::BodyRegistry;
//! use ephemcheck::validation::{validate_reference_file, Tolerance};
//!
//! # fn demo(registry: &BodyRegistry) -> Result<(), ephemcheck::EphemCheckError> {
//! let summary = validate_reference_file(
//!     Utf8Path::new("tests/data/horizons/mars.txt"),
//!     registry,
//!     &Tolerance::default(),
//! )?;
//! println!("{summary}");
//! # Ok(()) }
//! ```
pub mod batch;
pub mod mismatch;

use std::{fmt, io::BufRead};

use camino::Utf8Path;
use log::{info, trace};

use crate::{
    angle::Angle,
    constants::{ArcSec, ANGLE_FUDGE, SIZE_FUDGE},
    conversion::{default_angle_fudge, parse_sexagesimal},
    engine::{registry::BodyRegistry, BodyHandle, SizeCapability},
    ephemcheck_errors::EphemCheckError,
    horizons::{
        reader::{ReferenceEvent, ReferenceReader},
        record::ReferenceRecord,
    },
};
use mismatch::{Quantity, ValidationMismatch};

/// Maximum accepted deviations between computed and reference values.
///
/// The same tolerance applies to every body and every record of a run. The angular fudge
/// bounds the difference of each coordinate, right ascension included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub angle: Angle,
    pub size: ArcSec,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            angle: default_angle_fudge(),
            size: SIZE_FUDGE,
        }
    }
}

impl Tolerance {
    pub fn builder() -> ToleranceBuilder {
        ToleranceBuilder::default()
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tolerance(angle={}, size={:.3}\")",
            self.angle.fmt_degrees(),
            self.size
        )
    }
}

/// Builder for [`Tolerance`], with validation.
///
/// The angular fudge is given as a sexagesimal string in degrees, e.g. `"0:00:02"` for
/// 2 arcseconds.
#[derive(Debug, Clone)]
pub struct ToleranceBuilder {
    angle_fudge: String,
    size_fudge: ArcSec,
}

impl Default for ToleranceBuilder {
    fn default() -> Self {
        ToleranceBuilder {
            angle_fudge: ANGLE_FUDGE.to_string(),
            size_fudge: SIZE_FUDGE,
        }
    }
}

impl ToleranceBuilder {
    pub fn angle_fudge(mut self, sexagesimal: &str) -> Self {
        self.angle_fudge = sexagesimal.to_string();
        self
    }

    pub fn size_fudge(mut self, arcsec: ArcSec) -> Self {
        self.size_fudge = arcsec;
        self
    }

    pub fn build(self) -> Result<Tolerance, EphemCheckError> {
        let units = parse_sexagesimal(self.angle_fudge.trim()).ok_or_else(|| {
            EphemCheckError::InvalidTolerance(format!(
                "angle fudge {:?} is not a sexagesimal value",
                self.angle_fudge
            ))
        })?;
        if units <= 0.0 {
            return Err(EphemCheckError::InvalidTolerance(
                "angle fudge must be > 0".into(),
            ));
        }
        if !(self.size_fudge.is_finite() && self.size_fudge >= 0.0) {
            return Err(EphemCheckError::InvalidTolerance(
                "size fudge must be finite and >= 0".into(),
            ));
        }

        Ok(Tolerance {
            angle: Angle::from_degrees(units),
            size: self.size_fudge,
        })
    }
}

/// Outcome of a successful validation pass over one reference file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSummary {
    /// Last target declared by the file, `None` for a file without header.
    pub target: Option<String>,
    pub records: usize,
    pub ra_comparisons: usize,
    pub dec_comparisons: usize,
    pub size_comparisons: usize,
}

impl FileSummary {
    pub fn comparisons(&self) -> usize {
        self.ra_comparisons + self.dec_comparisons + self.size_comparisons
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} records, {} comparisons (ra={}, dec={}, size={})",
            self.target.as_deref().unwrap_or("<no target>"),
            self.records,
            self.comparisons(),
            self.ra_comparisons,
            self.dec_comparisons,
            self.size_comparisons
        )
    }
}

fn ensure_within(
    record: &ReferenceRecord,
    body: &str,
    quantity: Quantity,
    (computed, reference): (f64, f64),
    deviation: f64,
    fudge: f64,
) -> Result<(), EphemCheckError> {
    // NaN deviations never pass
    if !(deviation <= fudge) {
        return Err(ValidationMismatch {
            epoch: record.epoch,
            body: body.to_string(),
            line: record.line,
            quantity,
            computed,
            reference,
        }
        .into());
    }
    Ok(())
}

fn check_angle(
    record: &ReferenceRecord,
    body: &str,
    quantity: Quantity,
    computed: Angle,
    reference: Angle,
    fudge: Angle,
) -> Result<(), EphemCheckError> {
    ensure_within(
        record,
        body,
        quantity,
        (computed.radians(), reference.radians()),
        (computed - reference).abs().radians(),
        fudge.radians(),
    )
}

/// Compute `handle` at the record epoch and compare it with the record.
///
/// Arguments
/// -----------------
/// * `handle`: the body declared by the file header
/// * `record`: the reference position
/// * `tolerance`: the fudge factors
/// * `summary`: comparison counters, incremented for every comparison that passes
///
/// Return
/// ----------
/// * `Ok(())` if every compared quantity is within tolerance, otherwise the first
///   [`EphemCheckError::ValidationMismatch`] (or the engine error that prevented the comparison)
pub fn check_record(
    handle: &mut BodyHandle,
    record: &ReferenceRecord,
    tolerance: &Tolerance,
    summary: &mut FileSummary,
) -> Result<(), EphemCheckError> {
    let computed = handle.compute(&record.epoch)?;
    summary.records += 1;
    trace!("line {}: {} computed at {}", record.line, handle.name(), record.epoch);

    let body = handle.name();
    check_angle(
        record,
        body,
        Quantity::RightAscension,
        computed.ra,
        record.ra,
        tolerance.angle,
    )?;
    summary.ra_comparisons += 1;

    check_angle(
        record,
        body,
        Quantity::Declination,
        computed.dec,
        record.dec,
        tolerance.angle,
    )?;
    summary.dec_comparisons += 1;

    match handle.capability() {
        SizeCapability::SizeLess => {}
        SizeCapability::WithSize => {
            let size = computed
                .size
                .ok_or_else(|| EphemCheckError::MissingComputedSize {
                    body: body.to_string(),
                    epoch: record.epoch,
                })?;
            ensure_within(
                record,
                body,
                Quantity::AngularSize,
                (size, record.size),
                (size - record.size).abs(),
                tolerance.size,
            )?;
            summary.size_comparisons += 1;
        }
    }

    Ok(())
}

/// Validate one reference ephemeris read from `reader`.
///
/// Every `Target body name:` header resolves a fresh [`BodyHandle`] from `registry`; every
/// record that follows is checked with [`check_record`] against that handle.
///
/// Return
/// ----------
/// * the [`FileSummary`] of the pass, or the first error met
///   ([`EphemCheckError::MissingBody`] is raised before any following record is read)
pub fn validate_reader<R: BufRead>(
    reader: R,
    registry: &BodyRegistry,
    tolerance: &Tolerance,
) -> Result<FileSummary, EphemCheckError> {
    let mut summary = FileSummary::default();
    let mut handle: Option<BodyHandle> = None;

    for event in ReferenceReader::new(reader) {
        match event? {
            ReferenceEvent::Target(name) => {
                handle = Some(registry.resolve(&name)?);
                summary.target = Some(name.to_string());
            }
            ReferenceEvent::Record(record) => {
                let handle = handle
                    .as_mut()
                    .ok_or_else(|| EphemCheckError::MissingBody(record.body.to_string()))?;
                check_record(handle, &record, tolerance, &mut summary)?;
            }
        }
    }

    Ok(summary)
}

/// Validate one reference file.
///
/// See [`validate_reader`].
pub fn validate_reference_file(
    path: &Utf8Path,
    registry: &BodyRegistry,
    tolerance: &Tolerance,
) -> Result<FileSummary, EphemCheckError> {
    let file = std::fs::File::open(path)?;
    let summary = validate_reader(std::io::BufReader::new(file), registry, tolerance)?;
    info!("{path}: {summary}");
    Ok(summary)
}

#[cfg(test)]
mod validation_test {
    use std::{
        io::Cursor,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use approx::assert_relative_eq;
    use hifitime::Epoch;

    use super::*;
    use crate::engine::{BodyEphemeris, ComputedPosition};

    /// Always returns the same position, counting its computations.
    struct Pinned {
        position: ComputedPosition,
        capability: SizeCapability,
        calls: Arc<AtomicUsize>,
    }

    impl BodyEphemeris for Pinned {
        fn size_capability(&self) -> SizeCapability {
            self.capability
        }

        fn compute(&mut self, _epoch: &Epoch) -> Result<ComputedPosition, EphemCheckError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.position)
        }
    }

    fn record(ra: Angle, dec: Angle, size: ArcSec) -> ReferenceRecord {
        ReferenceRecord {
            body: "Mars".into(),
            line: 10,
            epoch: Epoch::from_gregorian_utc_hms(2020, 1, 1, 0, 0, 0),
            ra,
            dec,
            size,
        }
    }

    fn handle(position: ComputedPosition, capability: SizeCapability) -> BodyHandle {
        BodyHandle::new(
            "Mars".into(),
            Box::new(Pinned {
                position,
                capability,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        )
    }

    fn ra_23_59_59_95() -> Angle {
        Angle::from_hours(23.0 + 59.0 / 60.0 + 59.95 / 3600.0)
    }

    #[test]
    fn test_default_tolerance() {
        let tol = Tolerance::default();
        assert_eq!(tol.angle.fmt_degrees(), "0:00:02.0");
        assert_relative_eq!(tol.angle.arcsec(), 2.0, epsilon = 1e-9);
        assert_eq!(tol.size, 0.1);
        assert_eq!(Tolerance::builder().build().unwrap(), tol);
    }

    #[test]
    fn test_tolerance_builder_validation() {
        let tol = Tolerance::builder()
            .angle_fudge("0:00:01")
            .size_fudge(0.5)
            .build()
            .unwrap();
        assert_eq!(tol.angle.fmt_degrees(), "0:00:01.0");
        assert_eq!(tol.size, 0.5);

        assert!(matches!(
            Tolerance::builder().angle_fudge("two").build(),
            Err(EphemCheckError::InvalidTolerance(_))
        ));
        assert!(matches!(
            Tolerance::builder().angle_fudge("0:00:00").build(),
            Err(EphemCheckError::InvalidTolerance(_))
        ));
        assert!(matches!(
            Tolerance::builder().size_fudge(f64::NAN).build(),
            Err(EphemCheckError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn test_ra_wraparound_within_tolerance() {
        // 0.07 s of time, 1.05 arcsec across 0h
        let position = ComputedPosition {
            ra: Angle::from_hours(0.02 / 3600.0),
            dec: Angle::from_degrees(-5.0),
            size: Some(3.6),
        };
        let mut mars = handle(position, SizeCapability::WithSize);
        let mut summary = FileSummary::default();

        check_record(
            &mut mars,
            &record(ra_23_59_59_95(), Angle::from_degrees(-5.0), 3.6),
            &Tolerance::default(),
            &mut summary,
        )
        .unwrap();
        assert_eq!(summary.comparisons(), 3);
    }

    #[test]
    fn test_ra_wraparound_beyond_tolerance() {
        // 0.15 s of time, 2.25 arcsec across 0h
        let position = ComputedPosition {
            ra: Angle::from_hours(0.10 / 3600.0),
            dec: Angle::from_degrees(-5.0),
            size: Some(3.6),
        };
        let mut mars = handle(position, SizeCapability::WithSize);
        let mut summary = FileSummary::default();

        let err = check_record(
            &mut mars,
            &record(ra_23_59_59_95(), Angle::from_degrees(-5.0), 3.6),
            &Tolerance::default(),
            &mut summary,
        )
        .unwrap_err();

        let EphemCheckError::ValidationMismatch(mismatch) = err else {
            panic!("expected a mismatch, got {err:?}");
        };
        assert_eq!(mismatch.quantity, Quantity::RightAscension);
        assert_eq!(mismatch.body, "Mars");
        assert_eq!(mismatch.line, 10);
        assert_eq!(summary.records, 1);
        assert_eq!(summary.comparisons(), 0);
    }

    #[test]
    fn test_size_mismatch_and_missing_size() {
        let dec = Angle::from_degrees(10.0);
        let ra = Angle::from_hours(3.0);

        let mut mars = handle(
            ComputedPosition {
                ra,
                dec,
                size: Some(3.75),
            },
            SizeCapability::WithSize,
        );
        let err = check_record(
            &mut mars,
            &record(ra, dec, 3.6),
            &Tolerance::default(),
            &mut FileSummary::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EphemCheckError::ValidationMismatch(ref m) if m.quantity == Quantity::AngularSize
        ));

        let mut broken = handle(ComputedPosition { ra, dec, size: None }, SizeCapability::WithSize);
        let err = check_record(
            &mut broken,
            &record(ra, dec, 3.6),
            &Tolerance::default(),
            &mut FileSummary::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EphemCheckError::MissingComputedSize { .. }));
    }

    #[test]
    fn test_off_by_25_arcsec_in_ra_fails() {
        let dec = Angle::from_degrees(10.0);
        let ra = Angle::from_hours(3.0);
        let mut mars = handle(
            ComputedPosition {
                ra: Angle::from_radians(ra.radians() + Angle::from_arcsec(25.0).radians()),
                dec,
                size: Some(3.6),
            },
            SizeCapability::WithSize,
        );

        let err = check_record(
            &mut mars,
            &record(ra, dec, 3.6),
            &Tolerance::default(),
            &mut FileSummary::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EphemCheckError::ValidationMismatch(ref m) if m.quantity == Quantity::RightAscension
        ));
    }

    #[test]
    fn test_nan_values_are_rejected() {
        let dec = Angle::from_degrees(10.0);
        let ra = Angle::from_hours(3.0);
        let nan = Angle::from_radians(f64::NAN);

        for (position, expected) in [
            (
                ComputedPosition {
                    ra: nan,
                    dec,
                    size: Some(3.6),
                },
                Quantity::RightAscension,
            ),
            (
                ComputedPosition {
                    ra,
                    dec: nan,
                    size: Some(3.6),
                },
                Quantity::Declination,
            ),
            (
                ComputedPosition {
                    ra,
                    dec,
                    size: Some(f64::NAN),
                },
                Quantity::AngularSize,
            ),
        ] {
            let mut broken = handle(position, SizeCapability::WithSize);
            let mut summary = FileSummary::default();
            let err = check_record(
                &mut broken,
                &record(ra, dec, 3.6),
                &Tolerance::default(),
                &mut summary,
            )
            .unwrap_err();

            assert!(matches!(
                err,
                EphemCheckError::ValidationMismatch(ref m) if m.quantity == expected
            ));
            assert_eq!(summary.records, 1);
            assert!(summary.comparisons() < 3);
        }
    }

    #[test]
    fn test_size_less_body_skips_size() {
        let dec = Angle::from_degrees(10.0);
        let ra = Angle::from_hours(3.0);
        let mut moon = handle(ComputedPosition { ra, dec, size: None }, SizeCapability::SizeLess);
        let mut summary = FileSummary::default();

        check_record(&mut moon, &record(ra, dec, 999.0), &Tolerance::default(), &mut summary)
            .unwrap();
        assert_eq!(summary.size_comparisons, 0);
        assert_eq!(summary.comparisons(), 2);
    }

    #[test]
    fn test_missing_body_before_any_record() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let mut registry = BodyRegistry::new();
        registry.register("Mars", move || Pinned {
            position: ComputedPosition {
                ra: Angle::ZERO,
                dec: Angle::ZERO,
                size: None,
            },
            capability: SizeCapability::SizeLess,
            calls: Arc::clone(&counted),
        });

        let text = "Target body name: Vulcan (999)\n$$SOE\n garbage\n$$EOE\n";
        let result = validate_reader(Cursor::new(text), &registry, &Tolerance::default());
        assert_eq!(result, Err(EphemCheckError::MissingBody("Vulcan".into())));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_file_without_target() {
        let registry = BodyRegistry::new();
        let summary =
            validate_reader(Cursor::new("no header here\n"), &registry, &Tolerance::default())
                .unwrap();
        assert_eq!(summary, FileSummary::default());
        assert_eq!(
            summary.to_string(),
            "<no target>: 0 records, 0 comparisons (ra=0, dec=0, size=0)"
        );
    }
}
