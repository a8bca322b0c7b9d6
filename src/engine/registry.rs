//! # Body registry
//!
//! Maps body names, as they appear in the `Target body name:` header, to factories producing
//! fresh [`BodyEphemeris`] instances. Lookup is exact and case-sensitive; an unknown name is an
//! explicit [`EphemCheckError::MissingBody`].
//!
//! ```rust
//! use ephemcheck::engine::{registry::BodyRegistry, BodyEphemeris, ComputedPosition, SizeCapability};
//! use ephemcheck::EphemCheckError;
//! use hifitime::Epoch;
//!
//! struct Fixed;
//!
//! impl BodyEphemeris for Fixed {
//!     fn size_capability(&self) -> SizeCapability {
//!         SizeCapability::SizeLess
//!     }
//!     fn compute(&mut self, _epoch: &Epoch) -> Result<ComputedPosition, EphemCheckError> {
//!         Ok(ComputedPosition { ra: Default::default(), dec: Default::default(), size: None })
//!     }
//! }
//!
//! let mut registry = BodyRegistry::new();
//! registry.register("Phobos", || Fixed);
//!
//! assert!(registry.contains("Phobos"));
//! assert!(registry.resolve("Deimos").is_err());
//! ```
use std::{collections::HashMap, fmt, sync::Arc};

use ahash::RandomState;
use itertools::Itertools;

use super::{BodyEphemeris, BodyHandle};
use crate::ephemcheck_errors::EphemCheckError;

type BodyFactory = Box<dyn Fn() -> Box<dyn BodyEphemeris> + Send + Sync>;

#[derive(Default)]
pub struct BodyRegistry {
    factories: HashMap<String, BodyFactory, RandomState>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register<B, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        B: BodyEphemeris + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.factories.insert(
            name.into(),
            Box::new(move || Box::new(factory()) as Box<dyn BodyEphemeris>),
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build a fresh [`BodyHandle`] for `name`.
    ///
    /// Return
    /// ----------
    /// * the handle, with its size capability resolved, or
    ///   [`EphemCheckError::MissingBody`] if no factory is registered under that name
    pub fn resolve(&self, name: &str) -> Result<BodyHandle, EphemCheckError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| EphemCheckError::MissingBody(name.to_string()))?;
        Ok(BodyHandle::new(Arc::from(name), factory()))
    }
}

impl fmt::Debug for BodyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyRegistry")
            .field("names", &self.names())
            .finish()
    }
}
