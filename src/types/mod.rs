//! Shared data structures for the trophic-state cascade
//!
//! - `MeasurementCode` / `Measurements`: the validated input vocabulary
//! - `Term`: linguistic terms of every fuzzy variable
//! - `IndicatorKind` / `Phase`: identities and ordering of the cascade
//! - `IndicatorResult` / `IndicatorFailure`: per-indicator outcome
//! - `Chain`: everything produced for one sample

mod chain;
mod indicator;
mod measurement;
mod term;

pub use chain::*;
pub use indicator::*;
pub use measurement::*;
pub use term::*;
