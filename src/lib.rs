pub mod angle;
pub mod constants;
pub mod conversion;
pub mod engine;
pub mod ephemcheck_errors;
pub mod horizons;
pub mod time;
pub mod validation;

pub use angle::Angle;
pub use engine::{registry::BodyRegistry, BodyEphemeris, ComputedPosition, SizeCapability};
pub use ephemcheck_errors::EphemCheckError;
pub use validation::{
    batch::{validate_all, validate_directory, FullValidationResult, ValidationStats},
    validate_reference_file, FileSummary, Tolerance,
};
