//! Indicator models of the trophic cascade
//!
//! Each indicator pairs a [`Resolver`](crate::resolver::Resolver) with one
//! Mamdani inference unit per calculation strategy, and reports a crisp
//! value in [0, 1], a label and a confidence fixed by the strategy that fired.
//!
//! ## Indicators
//!
//! | Phase | Indicator              | Inputs                                   |
//! |-------|------------------------|------------------------------------------|
//! | 1     | Nitrogen level         | TN, TDN+PN, TKN+NOxN, nitrogen fractions |
//! | 1     | Phosphorus level       | TP, TDP+TPP, TIP+TRP, phosphorus fractions|
//! | 1     | Oxygen balance         | O2_Dis, BOD with COD or PV, BOD, COD, PV |
//! | 1     | Solids level           | TS, TDS+TSS, FS+VS, solid fractions      |
//! | 1     | Visibility level       | TRANS, TURB                              |
//! | 1     | Additional conditions  | TEMP, pH                                 |
//! | 2     | Nutrient level         | nitrogen, phosphorus                     |
//! | 3     | Physical conditions    | solids, visibility                       |
//! | 3     | Chemical conditions    | nutrients, oxygen                        |
//! | 4     | Eutrophication level   | chemical, physical, additional           |

pub mod additional;
pub mod chemical;
pub mod eutrophication;
pub mod model;
pub mod nitrogen;
pub mod nutrients;
pub mod oxygen;
pub mod phosphorus;
pub mod physical;
pub mod solids;
pub mod visibility;

pub use additional::AdditionalConditions;
pub use chemical::ChemicalConditions;
pub use eutrophication::EutrophicationLevel;
pub use model::IndicatorModel;
pub use nitrogen::NitrogenLevel;
pub use nutrients::NutrientLevel;
pub use oxygen::OxygenBalance;
pub use phosphorus::PhosphorusLevel;
pub use physical::PhysicalConditions;
pub use solids::SolidsLevel;
pub use visibility::VisibilityLevel;

use crate::engine::EngineSettings;
use crate::error::IndicatorError;
use crate::resolver::Evidence;
use crate::types::{IndicatorKind, IndicatorResult, InputKey, MeasurementCode, Term};

/// Identity mapping between four-level input and output scales.
pub(crate) const LEVELS: [(Term, Term); 4] = [
    (Term::Low, Term::Low),
    (Term::Moderate, Term::Moderate),
    (Term::High, Term::High),
    (Term::VeryHigh, Term::VeryHigh),
];

pub(crate) fn keys(codes: &[MeasurementCode]) -> Vec<InputKey> {
    codes.iter().copied().map(InputKey::from).collect()
}

/// A sub-assessment of the cascade.
///
/// Implementations only expose their model; evaluation and labeling are
/// shared.
pub trait Indicator: Send + Sync {
    fn model(&self) -> &IndicatorModel;

    fn kind(&self) -> IndicatorKind {
        self.model().kind()
    }

    /// Evaluate against one sample's evidence.
    fn evaluate(&self, evidence: &Evidence<'_>) -> Result<IndicatorResult, IndicatorError> {
        self.model().evaluate(evidence)
    }

    /// Label a crisp value with this indicator's output terms.
    fn label(&self, value: f64) -> Option<Term> {
        self.model().label(value)
    }
}

/// Create the full set of 10 indicators in cascade order.
pub fn default_indicators(settings: &EngineSettings) -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(NitrogenLevel::new(settings)),
        Box::new(PhosphorusLevel::new(settings)),
        Box::new(OxygenBalance::new(settings)),
        Box::new(SolidsLevel::new(settings)),
        Box::new(VisibilityLevel::new(settings)),
        Box::new(AdditionalConditions::new(settings)),
        Box::new(NutrientLevel::new(settings)),
        Box::new(PhysicalConditions::new(settings)),
        Box::new(ChemicalConditions::new(settings)),
        Box::new(EutrophicationLevel::new(settings)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_is_in_cascade_order() {
        let kinds: Vec<IndicatorKind> = default_indicators(&EngineSettings::default())
            .iter()
            .map(|i| i.kind())
            .collect();
        assert_eq!(kinds, IndicatorKind::ALL.to_vec());
    }

    #[test]
    fn test_every_model_is_consistent() {
        for settings in [
            EngineSettings::default(),
            EngineSettings {
                nutrients_require_both: false,
                ..EngineSettings::default()
            },
        ] {
            for indicator in default_indicators(&settings) {
                if let Err(e) = indicator.model().validate() {
                    panic!("{} is inconsistent: {e}", indicator.kind());
                }
            }
        }
    }

    #[test]
    fn test_outputs_live_on_the_unit_interval() {
        for indicator in default_indicators(&EngineSettings::default()) {
            let universe = indicator.model().output().universe;
            assert_eq!(universe.min, 0.0, "{}", indicator.kind());
            assert_eq!(universe.max, 1.0, "{}", indicator.kind());
        }
    }

    #[test]
    fn test_confidences_are_in_range() {
        for indicator in default_indicators(&EngineSettings::default()) {
            for strategy in indicator.model().resolver().strategies() {
                assert!(
                    (0.0..=1.0).contains(&strategy.confidence),
                    "{} {}",
                    indicator.kind(),
                    strategy.method
                );
            }
        }
    }
}
