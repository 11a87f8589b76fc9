//! Error types for indicator evaluation and engine configuration.
//!
//! Indicator errors never escape the cascade: the engine turns each one into
//! an [`IndicatorFailure`] entry of the chain's error map. Only caller errors
//! (an out-of-range phase depth, malformed input rows) surface as `Err`.

use crate::fuzzy::InferenceError;
use crate::types::{FailureKind, IndicatorFailure, IndicatorKind, InputKey};
use thiserror::Error;

fn join_keys(keys: &[InputKey]) -> String {
    keys.iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
}

/// Why an indicator could not produce a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("insufficient input for {indicator}: no usable value among [{}]", join_keys(.candidates))]
    InsufficientInput {
        indicator: IndicatorKind,
        candidates: Vec<InputKey>,
    },

    #[error("upstream value undefined for {indicator}: missing [{}]", join_keys(.missing))]
    UpstreamUndefined {
        indicator: IndicatorKind,
        missing: Vec<InputKey>,
    },

    #[error("inference failed for {indicator}: {source}")]
    Inference {
        indicator: IndicatorKind,
        #[source]
        source: InferenceError,
    },
}

impl IndicatorError {
    pub const fn indicator(&self) -> IndicatorKind {
        match self {
            Self::InsufficientInput { indicator, .. }
            | Self::UpstreamUndefined { indicator, .. }
            | Self::Inference { indicator, .. } => *indicator,
        }
    }

    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InsufficientInput { .. } => FailureKind::InsufficientInput,
            Self::UpstreamUndefined { .. } => FailureKind::UpstreamUndefined,
            Self::Inference { .. } => FailureKind::InferenceFailure,
        }
    }

    /// Entry for a chain's error map.
    pub fn to_failure(&self) -> IndicatorFailure {
        IndicatorFailure {
            kind: self.kind(),
            reason: self.to_string(),
        }
    }
}

/// Caller errors at the engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("phase depth must be between 1 and 4, got {0}")]
    InvalidPhaseDepth(u8),
    #[error("unknown indicator '{0}'")]
    UnknownIndicator(String),
}
