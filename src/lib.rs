//! Eutrophia: trophic state of water bodies by cascading fuzzy inference
//!
//! Heterogeneous, often incomplete physico-chemical measurements go through
//! ten Mamdani indicator models arranged in four phases. Each indicator picks
//! the most trusted inputs available, infers a value in [0, 1] with a
//! linguistic label, and reports a confidence fixed by the inputs it used.
//!
//! ## Architecture
//!
//! - **fuzzy**: membership functions, variables, rules and the inference unit
//! - **resolver**: priority-ordered input selection per indicator
//! - **indicators**: the ten indicator models and their rule tables
//! - **engine**: phase-by-phase cascade, single sample or batch
//! - **evaluation**: agreement with Carlson's Trophic State Index
//!
//! ```ignore
//! use eutrophia::{Measurements, MeasurementCode, PhaseDepth};
//!
//! let sample = Measurements::new()
//!     .with(MeasurementCode::Tn, 1.5)
//!     .with(MeasurementCode::Tp, 0.03);
//! let chain = eutrophia::infer(&sample, PhaseDepth::FULL);
//! println!("{}", chain.final_confidence());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fuzzy;
pub mod indicators;
pub mod locale;
pub mod resolver;
pub mod types;

pub use config::EutrophiaConfig;
pub use engine::{Engine, EngineSettings, PhaseDepth};
pub use error::{EngineError, IndicatorError};
pub use evaluation::{evaluate, Aptitude, EvaluationReport};
pub use locale::Locale;
pub use types::{
    Chain, FailureKind, IndicatorFailure, IndicatorKind, IndicatorResult, InputKey,
    MeasurementCode, Measurements, Phase, PhaseConfidences, Term,
};

use std::sync::OnceLock;

static DEFAULT_ENGINE: OnceLock<Engine> = OnceLock::new();

/// Engine with default settings, built on first use.
pub fn default_engine() -> &'static Engine {
    DEFAULT_ENGINE.get_or_init(Engine::new)
}

/// Run the cascade on one sample with the default engine.
pub fn infer(measurements: &Measurements, depth: PhaseDepth) -> Chain {
    default_engine().infer(measurements, depth)
}

/// Run the cascade on every row, in order, with the default engine.
pub fn infer_batch(rows: &[Measurements], depth: PhaseDepth) -> Vec<Chain> {
    default_engine().infer_batch(rows, depth)
}
