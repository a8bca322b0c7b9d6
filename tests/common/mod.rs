#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use ephemcheck::{
    conversion::{parse_dec, parse_ra},
    time::horizons_date_to_epoch,
    Angle, BodyEphemeris, BodyRegistry, ComputedPosition, EphemCheckError, SizeCapability,
};
use hifitime::Epoch;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fake engine answering from a fixed table of epochs.
#[derive(Clone)]
pub struct Tabulated {
    pub name: String,
    pub capability: SizeCapability,
    pub samples: Vec<(Epoch, ComputedPosition)>,
    pub calls: Arc<AtomicUsize>,
}

impl Tabulated {
    pub fn new(
        name: &str,
        capability: SizeCapability,
        samples: Vec<(Epoch, ComputedPosition)>,
    ) -> Self {
        Tabulated {
            name: name.to_string(),
            capability,
            samples,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Shift the right ascension of the sample at `epoch` by `seconds` of time.
    pub fn shift_ra(mut self, date: &str, seconds: f64) -> Self {
        let epoch = horizons_date_to_epoch(date).unwrap();
        for (e, position) in self.samples.iter_mut() {
            if *e == epoch {
                position.ra = Angle::from_hours(position.ra.hours() + seconds / 3600.0);
            }
        }
        self
    }
}

impl BodyEphemeris for Tabulated {
    fn size_capability(&self) -> SizeCapability {
        self.capability
    }

    fn compute(&mut self, epoch: &Epoch) -> Result<ComputedPosition, EphemCheckError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.samples
            .iter()
            .find(|(e, _)| e == epoch)
            .map(|(_, position)| *position)
            .ok_or_else(|| EphemCheckError::EngineFailure {
                body: self.name.clone(),
                epoch: *epoch,
                reason: "epoch outside the table".into(),
            })
    }
}

pub fn sample(date: &str, ra: &str, dec: &str, size: Option<f64>) -> (Epoch, ComputedPosition) {
    (
        horizons_date_to_epoch(date).unwrap(),
        ComputedPosition {
            ra: parse_ra(ra).unwrap(),
            dec: parse_dec(dec).unwrap(),
            size,
        },
    )
}

/// Mars as the engine sees it, within 2 arcseconds of `mars.txt`. The first right ascension
/// sits on the other side of 0h from the reference value 23:59:59.95.
pub fn mars() -> Tabulated {
    Tabulated::new(
        "Mars",
        SizeCapability::WithSize,
        vec![
            sample("2020-Jan-01 00:00", "00 00 00.02", "-05 12 30.5", Some(3.62)),
            sample("2020-Jan-01 12:00", "00 01 19.45", "-05 03 44.3", Some(3.60)),
            sample("2020-Jan-02 00:00", "00 02 41.20", "-04 55 01.0", Some(3.55)),
        ],
    )
}

pub fn phobos() -> Tabulated {
    Tabulated::new(
        "Phobos",
        SizeCapability::SizeLess,
        vec![
            sample("2020-Jan-01 00:00", "23 59 45.10", "-05 13 10.2", None),
            sample("2020-Jan-02 00:00", "00 02 28.31", "-04 55 40.8", None),
        ],
    )
}

pub fn venus() -> Tabulated {
    Tabulated::new(
        "Venus",
        SizeCapability::WithSize,
        vec![
            sample("2020-Jan-01 00:00", "20 10 04.24", "-20 24 38.5", Some(11.54)),
            sample("2020-Jan-02 00:00", "20 15 22.84", "-20 05 17.1", Some(11.59)),
            sample("2020-Feb-01 00:00", "22 50 37.35", "-08 46 17.4", Some(13.39)),
        ],
    )
}

/// Register clones of `bodies`, which keep sharing their call counters.
pub fn registry_of(bodies: &[&Tabulated]) -> BodyRegistry {
    let mut registry = BodyRegistry::new();
    for body in bodies {
        let body = (*body).clone();
        registry.register(body.name.clone(), move || body.clone());
    }
    registry
}
