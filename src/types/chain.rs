//! Per-sample cascade output.

use super::{IndicatorFailure, IndicatorKind, IndicatorResult, Phase};
use serde::Serialize;
use std::collections::BTreeMap;

/// Confidence of each cascade phase.
///
/// Phases that did not run (beyond the requested depth) stay at 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PhaseConfidences {
    pub primary: f64,
    pub nutrients: f64,
    pub conditions: f64,
    pub trophic: f64,
}

impl PhaseConfidences {
    pub const fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Primary => self.primary,
            Phase::Nutrients => self.nutrients,
            Phase::Conditions => self.conditions,
            Phase::Trophic => self.trophic,
        }
    }

    pub fn set(&mut self, phase: Phase, confidence: f64) {
        match phase {
            Phase::Primary => self.primary = confidence,
            Phase::Nutrients => self.nutrients = confidence,
            Phase::Conditions => self.conditions = confidence,
            Phase::Trophic => self.trophic = confidence,
        }
    }

    /// Mean of the four phase confidences.
    pub fn overall(&self) -> f64 {
        (self.primary + self.nutrients + self.conditions + self.trophic) / 4.0
    }
}

/// Results of every indicator for one sample, plus the reasons for each
/// undefined one.
///
/// Every [`IndicatorKind`] has an entry in `results`. An entry's value is
/// undefined exactly when the kind appears in `errors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chain {
    pub results: BTreeMap<IndicatorKind, IndicatorResult>,
    pub errors: BTreeMap<IndicatorKind, IndicatorFailure>,
    pub phases: PhaseConfidences,
    /// Number of phases that ran.
    pub depth: u8,
}

impl Chain {
    /// A chain with every indicator undefined and no errors recorded yet.
    pub fn empty(depth: u8) -> Self {
        Self {
            results: IndicatorKind::ALL
                .into_iter()
                .map(|k| (k, IndicatorResult::undefined()))
                .collect(),
            errors: BTreeMap::new(),
            phases: PhaseConfidences::default(),
            depth,
        }
    }

    pub fn result(&self, kind: IndicatorKind) -> Option<&IndicatorResult> {
        self.results.get(&kind)
    }

    pub fn value(&self, kind: IndicatorKind) -> Option<f64> {
        self.result(kind).and_then(|r| r.value)
    }

    pub fn is_defined(&self, kind: IndicatorKind) -> bool {
        self.value(kind).is_some()
    }

    pub fn error(&self, kind: IndicatorKind) -> Option<&IndicatorFailure> {
        self.errors.get(&kind)
    }

    /// Mean of the four phase confidences.
    pub fn final_confidence(&self) -> f64 {
        self.phases.overall()
    }

    /// Final eutrophication result.
    pub fn eutrophication(&self) -> Option<&IndicatorResult> {
        self.result(IndicatorKind::EutrophicationLevel)
    }
}
