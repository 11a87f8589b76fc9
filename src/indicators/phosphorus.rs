//! Phosphorus level from total phosphorus or its fractions.

use super::{keys, Indicator, IndicatorModel, LEVELS};
use crate::engine::EngineSettings;
use crate::fuzzy::{pass_through, FuzzyVariable, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::IndicatorKind;
use crate::types::MeasurementCode::{self, Dip, Drp, Tdp, Tip, Tp, Tpp, Trp};

/// Measurements considered, most trusted first.
pub const PRIORITY: [MeasurementCode; 7] = [Tp, Tdp, Tip, Dip, Trp, Drp, Tpp];

const CONFIDENCE: f64 = 1.0;

/// Output scale, shared as an antecedent by the nutrient level.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::four_level(
        IndicatorKind::PhosphorusLevel.key(),
        Universe::unit(),
        [0.0, 0.0, 0.15, 0.3],
        [0.25, 0.4, 0.55],
        [0.5, 0.65, 0.8],
        [0.75, 0.85, 1.0, 1.0],
    )
}

fn inputs() -> Vec<FuzzyVariable> {
    let u05 = Universe::new(0.0, 0.5, 0.01);
    let u025 = Universe::new(0.0, 0.25, 0.01);

    let dissolved = |name| {
        FuzzyVariable::four_level(name, u05, [0.0, 0.0, 0.01, 0.03], [0.02, 0.05, 0.1], [0.08, 0.15, 0.25], [0.2, 0.35, 0.5, 0.5])
    };
    let phosphate = |name| {
        FuzzyVariable::four_level(name, u025, [0.0, 0.0, 0.005, 0.015], [0.01, 0.03, 0.06], [0.05, 0.1, 0.15], [0.12, 0.18, 0.25, 0.25])
    };

    vec![
        FuzzyVariable::four_level(Tp.code(), Universe::new(0.0, 0.1, 0.001), [0.0, 0.0, 0.010, 0.015], [0.012, 0.018, 0.024], [0.024, 0.06, 0.096], [0.090, 0.096, 0.1, 0.1]),
        dissolved(Tdp.code()),
        dissolved(Trp.code()),
        FuzzyVariable::four_level(Tip.code(), u05, [0.0, 0.0, 0.015, 0.035], [0.025, 0.06, 0.1], [0.08, 0.15, 0.25], [0.2, 0.35, 0.5, 0.5]),
        phosphate(Dip.code()),
        phosphate(Drp.code()),
        FuzzyVariable::four_level(Tpp.code(), u05, [0.0, 0.0, 0.005, 0.02], [0.015, 0.04, 0.08], [0.06, 0.12, 0.2], [0.15, 0.25, 0.5, 0.5]),
    ]
}

/// Phosphorus level indicator.
pub struct PhosphorusLevel {
    model: IndicatorModel,
}

impl PhosphorusLevel {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::PhosphorusLevel;
        let resolver = Resolver::with_single_fallbacks(
            kind,
            keys(&PRIORITY),
            vec![
                Strategy::direct("TP", Tp, CONFIDENCE),
                Strategy::derived_sum("TDP_TPP", [Tdp.into(), Tpp.into()], Tp, CONFIDENCE),
                Strategy::derived_sum("TIP_TRP", [Tip.into(), Trp.into()], Tp, CONFIDENCE),
            ],
            CONFIDENCE,
        );

        let model = IndicatorModel::new(
            kind,
            resolver,
            &inputs(),
            output(),
            settings.clamp_inputs,
            |strategy| {
                strategy
                    .source
                    .variables()
                    .first()
                    .map_or_else(Vec::new, |key| pass_through(key.name(), &LEVELS))
            },
        );
        Self { model }
    }
}

impl Indicator for PhosphorusLevel {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use crate::resolver::Evidence;
    use crate::types::{IndicatorResult, Measurements, Term};
    use std::collections::BTreeMap;

    fn evaluate(m: &Measurements) -> Result<IndicatorResult, IndicatorError> {
        let upstream = BTreeMap::new();
        PhosphorusLevel::new(&EngineSettings::default()).evaluate(&Evidence::new(m, &upstream))
    }

    #[test]
    fn test_total_phosphorus_scale() {
        let low = evaluate(&Measurements::new().with(Tp, 0.005)).expect("resolves");
        assert_eq!(low.label, Some(Term::Low));

        let high = evaluate(&Measurements::new().with(Tp, 0.06)).expect("resolves");
        assert_eq!(high.label, Some(Term::High));
    }

    #[test]
    fn test_concentration_above_scale_saturates() {
        let r = evaluate(&Measurements::new().with(Tp, 0.4)).expect("resolves");
        assert_eq!(r.label, Some(Term::VeryHigh));
    }

    #[test]
    fn test_dissolved_plus_particulate() {
        let r = evaluate(&Measurements::new().with(Tdp, 0.01).with(Tpp, 0.008)).expect("resolves");
        assert_eq!(r.calculation_method, Some("TDP_TPP"));
        assert_eq!(r.label, Some(Term::Moderate));
    }

    #[test]
    fn test_unrelated_measurements_are_insufficient() {
        let err = evaluate(&Measurements::new().with(MeasurementCode::Tn, 0.2)).unwrap_err();
        assert!(matches!(err, IndicatorError::InsufficientInput { .. }));
    }
}
