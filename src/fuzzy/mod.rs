//! Fuzzy logic primitives
//!
//! Everything the indicator models are assembled from:
//!
//! - [`MembershipFunction`]: trapezoid and triangle shapes
//! - [`FuzzyVariable`] / [`Universe`]: named, discretized linguistic variables
//! - [`Rule`] / [`Antecedent`]: min/max implications over `(variable, term)` atoms
//! - [`InferenceUnit`]: Mamdani inference with discrete centroid defuzzification
//!
//! All types are immutable once built and shared across samples.

mod mamdani;
mod membership;
mod rule;
mod variable;

pub use mamdani::{Inference, InferenceError, InferenceUnit};
pub use membership::MembershipFunction;
pub use rule::{is, is_any, pass_through, Antecedent, Degrees, Rule};
pub use variable::{FuzzyVariable, Universe};

use crate::types::Term;
use thiserror::Error;

/// Construction and lookup errors in fuzzy definitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    #[error("membership breakpoints must be finite and non-decreasing: {0:?}")]
    InvalidBreakpoints(Vec<f64>),
    #[error("invalid universe [{min}, {max}] with step {step}")]
    InvalidUniverse { min: f64, max: f64, step: f64 },
    #[error("variable '{0}' declares no terms")]
    NoTerms(&'static str),
    #[error("variable '{variable}' has no term {term}")]
    UnknownTerm { variable: &'static str, term: Term },
    #[error("rule references undeclared variable '{0}'")]
    UnknownVariable(&'static str),
}
