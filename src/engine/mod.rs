//! # Computation-engine seam
//!
//! ephemcheck never computes positions itself. The engine under test is plugged in through
//! the [`BodyEphemeris`] trait and registered by name in a
//! [`BodyRegistry`](crate::engine::registry::BodyRegistry).
//!
//! ## Contract
//! -----------------
//! * [`BodyEphemeris::compute`] brings the body to a given epoch and returns its apparent
//!   position. Each call overwrites the state left by the previous one, so calls on one body
//!   are strictly sequential (`&mut self`).
//! * [`BodyEphemeris::size_capability`] tells once and for all whether the body exposes an
//!   apparent angular diameter. Natural satellites typically do not.
//! * A [`SizeCapability::WithSize`] body must return `Some(size)` from every computation; a
//!   missing size is reported as
//!   [`EphemCheckError::MissingComputedSize`](crate::ephemcheck_errors::EphemCheckError::MissingComputedSize).
//!
//! [`BodyHandle`] pairs a resolved body with its declared name and capability; it is what the
//! validation runner owns for the duration of one reference file.
pub mod registry;

use std::{fmt, sync::Arc};

use hifitime::Epoch;

use crate::{angle::Angle, constants::ArcSec, ephemcheck_errors::EphemCheckError};

/// Whether a body exposes an apparent angular diameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCapability {
    WithSize,
    SizeLess,
}

/// Apparent position of a body at the epoch of the last computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedPosition {
    pub ra: Angle,
    pub dec: Angle,
    /// Apparent angular diameter in arcseconds, for bodies that have one.
    pub size: Option<ArcSec>,
}

/// A stateful position computation bound to one body.
pub trait BodyEphemeris {
    fn size_capability(&self) -> SizeCapability;

    /// Compute the apparent position of the body at `epoch`.
    ///
    /// Engines report their own failures (epoch outside the supported span, missing data, …)
    /// as [`EphemCheckError::EngineFailure`].
    fn compute(&mut self, epoch: &Epoch) -> Result<ComputedPosition, EphemCheckError>;
}

/// A resolved body, exclusively owned by the runner while one reference file is validated.
pub struct BodyHandle {
    name: Arc<str>,
    capability: SizeCapability,
    body: Box<dyn BodyEphemeris>,
}

impl BodyHandle {
    pub(crate) fn new(name: Arc<str>, body: Box<dyn BodyEphemeris>) -> Self {
        let capability = body.size_capability();
        BodyHandle {
            name,
            capability,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> SizeCapability {
        self.capability
    }

    pub fn compute(&mut self, epoch: &Epoch) -> Result<ComputedPosition, EphemCheckError> {
        self.body.compute(epoch)
    }
}

impl fmt::Debug for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyHandle")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}
