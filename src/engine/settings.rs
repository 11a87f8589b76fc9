//! Engine tuning and the requested cascade depth.

use crate::config::EutrophiaConfig;
use crate::error::EngineError;
use crate::types::Phase;
use serde::{Deserialize, Serialize};

/// Switches that change how indicator models are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Nutrient level needs both the nitrogen and the phosphorus level.
    /// When false, either one alone is passed through at confidence 0.5.
    pub nutrients_require_both: bool,
    /// Clip crisp inputs to their variable's universe before fuzzification.
    pub clamp_inputs: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            nutrients_require_both: true,
            clamp_inputs: true,
        }
    }
}

impl From<&EutrophiaConfig> for EngineSettings {
    fn from(config: &EutrophiaConfig) -> Self {
        Self {
            nutrients_require_both: config.engine.nutrients_require_both,
            clamp_inputs: config.engine.clamp_inputs,
        }
    }
}

/// How many cascade phases to run, 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PhaseDepth(u8);

impl PhaseDepth {
    pub const FULL: Self = Self(4);

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn includes(self, phase: Phase) -> bool {
        phase.number() <= self.0
    }

    pub const fn is_full(self) -> bool {
        self.0 == Self::FULL.0
    }
}

impl Default for PhaseDepth {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u8> for PhaseDepth {
    type Error = EngineError;

    fn try_from(depth: u8) -> Result<Self, Self::Error> {
        if (1..=4).contains(&depth) {
            Ok(Self(depth))
        } else {
            Err(EngineError::InvalidPhaseDepth(depth))
        }
    }
}

impl From<PhaseDepth> for u8 {
    fn from(depth: PhaseDepth) -> Self {
        depth.0
    }
}

impl std::fmt::Display for PhaseDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
