//! Cascade engine: runs the indicator models phase by phase.
//!
//! ## Phases
//!
//! | Phase | Indicators                                              | Phase confidence      |
//! |-------|---------------------------------------------------------|-----------------------|
//! | 1     | nitrogen, phosphorus, oxygen, solids, visibility, additional | mean of the six  |
//! | 2     | nutrient level                                          | nutrient confidence   |
//! | 3     | physical, chemical conditions                           | mean of the two       |
//! | 4     | eutrophication level                                    | its own confidence    |
//!
//! Indicators of a phase only see the measurements plus the values produced
//! by strictly earlier phases. A failed indicator contributes confidence 0 to
//! its phase and leaves its dependents undefined; nothing aborts the cascade.
//!
//! After a full run the final confidence (mean of the four phase confidences)
//! replaces the eutrophication level's own confidence.

mod settings;

pub use settings::{EngineSettings, PhaseDepth};

use crate::config::EutrophiaConfig;
use crate::error::EngineError;
use crate::indicators::{self, Indicator};
use crate::resolver::Evidence;
use crate::types::{
    Chain, FailureKind, IndicatorFailure, IndicatorKind, IndicatorResult, Measurements, Phase, Term,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Immutable set of indicator models. Cheap to share across threads.
pub struct Engine {
    indicators: Vec<Box<dyn Indicator>>,
    settings: EngineSettings,
}

impl Engine {
    /// Engine with the default settings.
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            indicators: indicators::default_indicators(&settings),
            settings,
        }
    }

    pub fn from_config(config: &EutrophiaConfig) -> Self {
        Self::with_settings(EngineSettings::from(config))
    }

    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn indicator(&self, kind: IndicatorKind) -> Option<&dyn Indicator> {
        self.indicators
            .iter()
            .find(|i| i.kind() == kind)
            .map(|i| i.as_ref())
    }

    /// Models in cascade order.
    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    /// Run the cascade on one sample up to `depth`.
    pub fn infer(&self, measurements: &Measurements, depth: PhaseDepth) -> Chain {
        let mut chain = Chain::empty(depth.get());
        let mut upstream: BTreeMap<IndicatorKind, f64> = BTreeMap::new();

        for phase in Phase::ALL {
            if !depth.includes(phase) {
                for kind in IndicatorKind::in_phase(phase) {
                    chain.errors.insert(
                        kind,
                        IndicatorFailure {
                            kind: FailureKind::Skipped,
                            reason: format!(
                                "{kind} skipped: phase {} is beyond depth {depth}",
                                phase.number()
                            ),
                        },
                    );
                }
                continue;
            }

            let evidence = Evidence::new(measurements, &upstream);
            let outcomes: Vec<_> = self
                .indicators
                .iter()
                .filter(|i| i.kind().phase() == phase)
                .map(|i| (i.kind(), i.evaluate(&evidence)))
                .collect();

            // Values land in `upstream` only once the whole phase has run.
            let count = outcomes.len();
            let mut confidence = 0.0;
            for (kind, outcome) in outcomes {
                match outcome {
                    Ok(result) => {
                        confidence += result.confidence;
                        if let Some(value) = result.value {
                            upstream.insert(kind, value);
                        }
                        chain.results.insert(kind, result);
                    }
                    Err(e) => {
                        debug!(indicator = %kind, error = %e, "Indicator undefined");
                        chain.errors.insert(kind, e.to_failure());
                    }
                }
            }
            if count > 0 {
                #[allow(clippy::cast_precision_loss)]
                chain.phases.set(phase, confidence / count as f64);
            }
        }

        if depth.is_full() {
            let final_confidence = chain.final_confidence();
            if let Some(result) = chain
                .results
                .get_mut(&IndicatorKind::EutrophicationLevel)
                .filter(|r| r.is_defined())
            {
                result.confidence = final_confidence;
            }
        }

        chain
    }

    /// Sequential batch, one chain per row in input order.
    pub fn infer_batch(&self, rows: &[Measurements], depth: PhaseDepth) -> Vec<Chain> {
        let chains: Vec<Chain> = rows.iter().map(|m| self.infer(m, depth)).collect();
        log_batch(&chains, depth, false);
        chains
    }

    /// Same output as [`Engine::infer_batch`], spread over the rayon pool.
    pub fn infer_batch_parallel(&self, rows: &[Measurements], depth: PhaseDepth) -> Vec<Chain> {
        let chains: Vec<Chain> = rows.par_iter().map(|m| self.infer(m, depth)).collect();
        log_batch(&chains, depth, true);
        chains
    }

    /// Label a crisp value, typically a forecast, with an indicator's output
    /// terms.
    pub fn label_for(&self, kind: IndicatorKind, value: f64) -> Option<Term> {
        self.indicator(kind).and_then(|i| i.label(value))
    }

    /// Same as [`Engine::label_for`] with the indicator given by its key.
    pub fn label_for_key(&self, key: &str, value: f64) -> Result<Option<Term>, EngineError> {
        let kind = IndicatorKind::from_key(key)
            .ok_or_else(|| EngineError::UnknownIndicator(key.to_string()))?;
        Ok(self.label_for(kind, value))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("indicators", &self.indicators.len())
            .field("settings", &self.settings)
            .finish()
    }
}

fn log_batch(chains: &[Chain], depth: PhaseDepth, parallel: bool) {
    let defined = chains
        .iter()
        .filter(|c| c.eutrophication().is_some_and(IndicatorResult::is_defined))
        .count();
    info!(
        rows = chains.len(),
        eutrophication_defined = defined,
        depth = depth.get(),
        parallel,
        "Batch inference complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeasurementCode::{Bod, Cod, O2Dis, Ph, Temp, Tn, Tp, Trans, Ts, Turb};

    fn full_sample() -> Measurements {
        Measurements::new()
            .with(Tn, 1.5)
            .with(Tp, 0.03)
            .with(O2Dis, 8.0)
            .with(Bod, 4.0)
            .with(Cod, 20.0)
            .with(Ts, 600.0)
            .with(Trans, 2.5)
            .with(Turb, 12.0)
            .with(Temp, 20.0)
            .with(Ph, 7.4)
    }

    #[test]
    fn test_full_sample_defines_every_indicator() {
        let chain = Engine::new().infer(&full_sample(), PhaseDepth::FULL);
        assert!(chain.errors.is_empty(), "unexpected errors: {:?}", chain.errors);
        for kind in IndicatorKind::ALL {
            assert!(chain.is_defined(kind), "{kind} undefined");
        }
        let eutrophication = chain.eutrophication().expect("present");
        assert_eq!(eutrophication.confidence, chain.final_confidence());
        assert!(eutrophication.label.is_some_and(|t| {
            matches!(
                t,
                Term::Oligotrophic | Term::Mesotrophic | Term::Eutrophic | Term::Hypereutrophic
            )
        }));
    }

    #[test]
    fn test_phase_confidences_with_full_evidence() {
        let chain = Engine::new().infer(&full_sample(), PhaseDepth::FULL);
        assert_eq!(chain.phases.primary, 1.0);
        assert_eq!(chain.phases.nutrients, 1.0);
        assert_eq!(chain.phases.conditions, 1.0);
        assert_eq!(chain.phases.trophic, 1.0);
        assert_eq!(chain.final_confidence(), 1.0);
    }

    #[test]
    fn test_failed_primary_indicator_counts_as_zero() {
        let sample = full_sample().with(Temp, f64::NAN).with(Ph, f64::NAN);
        let chain = Engine::new().infer(&sample, PhaseDepth::FULL);
        assert_eq!(
            chain.error(IndicatorKind::AdditionalConditions).map(|f| f.kind),
            Some(FailureKind::InsufficientInput)
        );
        assert!((chain.phases.primary - 5.0 / 6.0).abs() < 1e-12);
        assert_eq!(
            chain.result(IndicatorKind::EutrophicationLevel).and_then(|r| r.calculation_method),
            Some("CHEMICAL_PHYSICAL")
        );
        assert_eq!(chain.phases.trophic, 0.9);
    }

    #[test]
    fn test_partial_depth_skips_later_phases() {
        let depth = PhaseDepth::try_from(2).expect("valid depth");
        let chain = Engine::new().infer(&full_sample(), depth);
        assert!(chain.is_defined(IndicatorKind::NutrientLevel));
        for kind in [
            IndicatorKind::PhysicalConditions,
            IndicatorKind::ChemicalConditions,
            IndicatorKind::EutrophicationLevel,
        ] {
            assert!(!chain.is_defined(kind));
            assert_eq!(chain.error(kind).map(|f| f.kind), Some(FailureKind::Skipped));
            assert_eq!(chain.result(kind).map(|r| r.confidence), Some(0.0));
        }
        assert_eq!(chain.phases.conditions, 0.0);
        assert_eq!(chain.phases.trophic, 0.0);
        assert_eq!(chain.final_confidence(), 0.5);
    }

    #[test]
    fn test_label_for_uses_output_terms() {
        let engine = Engine::new();
        assert_eq!(
            engine.label_for(IndicatorKind::EutrophicationLevel, 0.9),
            Some(Term::Hypereutrophic)
        );
        assert_eq!(
            engine.label_for_key("chemical_conditions", 0.1),
            Ok(Some(Term::Good))
        );
        assert!(engine.label_for_key("salinity", 0.1).is_err());
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let engine = Engine::new();
        let rows = vec![
            full_sample(),
            Measurements::new(),
            Measurements::new().with(Tn, 0.2),
            full_sample().with(Tp, 0.09),
        ];
        let sequential = engine.infer_batch(&rows, PhaseDepth::FULL);
        let parallel = engine.infer_batch_parallel(&rows, PhaseDepth::FULL);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), rows.len());
    }
}
