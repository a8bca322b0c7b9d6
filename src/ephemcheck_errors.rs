use hifitime::Epoch;
use thiserror::Error;

use crate::{horizons::record::ParseRecordError, validation::mismatch::ValidationMismatch};

#[derive(Error, Debug)]
pub enum EphemCheckError {
    #[error("The computation engine lacks a body named {0:?}")]
    MissingBody(String),

    #[error("Malformed target header at line {line}: {content:?}")]
    MalformedHeader { line: usize, content: String },

    #[error("Malformed record at line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: ParseRecordError,
    },

    #[error("{0}")]
    ValidationMismatch(Box<ValidationMismatch>),

    #[error("{body} declares an angular size but returned none at {epoch}")]
    MissingComputedSize { body: String, epoch: Epoch },

    #[error("Computation of {body} failed at {epoch}: {reason}")]
    EngineFailure {
        body: String,
        epoch: Epoch,
        reason: String,
    },

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ValidationMismatch> for EphemCheckError {
    fn from(mismatch: ValidationMismatch) -> Self {
        EphemCheckError::ValidationMismatch(Box::new(mismatch))
    }
}

impl PartialEq for EphemCheckError {
    fn eq(&self, other: &Self) -> bool {
        use EphemCheckError::*;
        match (self, other) {
            (MissingBody(a), MissingBody(b)) => a == b,
            (
                MalformedHeader {
                    line: la,
                    content: ca,
                },
                MalformedHeader {
                    line: lb,
                    content: cb,
                },
            ) => la == lb && ca == cb,
            (
                MalformedRecord {
                    line: la,
                    source: sa,
                },
                MalformedRecord {
                    line: lb,
                    source: sb,
                },
            ) => la == lb && sa == sb,
            (ValidationMismatch(a), ValidationMismatch(b)) => a == b,
            (
                MissingComputedSize {
                    body: ba,
                    epoch: ea,
                },
                MissingComputedSize {
                    body: bb,
                    epoch: eb,
                },
            ) => ba == bb && ea == eb,
            (
                EngineFailure {
                    body: ba,
                    epoch: ea,
                    reason: ra,
                },
                EngineFailure {
                    body: bb,
                    epoch: eb,
                    reason: rb,
                },
            ) => ba == bb && ea == eb && ra == rb,
            (InvalidTolerance(a), InvalidTolerance(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,

            // io::Error carries no comparable payload: same variant is enough
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
