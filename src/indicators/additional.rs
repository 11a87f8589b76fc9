//! Additional conditions: whether temperature and pH favour algal growth.

use super::{keys, Indicator, IndicatorModel};
use crate::engine::EngineSettings;
use crate::fuzzy::{is, is_any, FuzzyVariable, MembershipFunction, Rule, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::MeasurementCode::{self, Ph, Temp};
use crate::types::{IndicatorKind, Term};

/// Measurements considered, most trusted first.
pub const PRIORITY: [MeasurementCode; 2] = [Temp, Ph];

/// Output scale, shared as an antecedent by the eutrophication level.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::new(
        IndicatorKind::AdditionalConditions.key(),
        Universe::unit(),
        [
            (Term::Unfavorable, MembershipFunction::Trapezoid([0.0, 0.0, 0.2, 0.4])),
            (Term::Neutral, MembershipFunction::Triangle([0.3, 0.5, 0.7])),
            (Term::Favorable, MembershipFunction::Trapezoid([0.6, 0.8, 1.0, 1.0])),
        ],
    )
}

fn inputs() -> Vec<FuzzyVariable> {
    vec![
        FuzzyVariable::new(
            Temp.code(),
            Universe::new(0.0, 35.0, 0.1),
            [
                (Term::VeryLow, MembershipFunction::Trapezoid([0.0, 0.0, 4.0, 6.0])),
                (Term::Low, MembershipFunction::Triangle([4.0, 8.0, 12.0])),
                (Term::Moderate, MembershipFunction::Triangle([10.0, 18.0, 26.0])),
                (Term::High, MembershipFunction::Trapezoid([24.0, 28.0, 35.0, 35.0])),
            ],
        ),
        FuzzyVariable::new(
            Ph.code(),
            Universe::new(5.0, 10.0, 0.1),
            [
                (Term::Acid, MembershipFunction::Trapezoid([5.0, 5.0, 6.0, 6.5])),
                (Term::Neutral, MembershipFunction::Triangle([6.0, 7.0, 8.0])),
                (Term::Alkaline, MembershipFunction::Trapezoid([7.5, 8.5, 10.0, 10.0])),
            ],
        ),
    ]
}

fn rules(method: &str) -> Vec<Rule> {
    let (temp, ph) = (Temp.code(), Ph.code());
    let warm = || is_any(temp, &[Term::Moderate, Term::High]);
    let off_neutral = || is_any(ph, &[Term::Acid, Term::Alkaline]);

    match method {
        "TEMP_pH" => vec![
            Rule::new(warm().and(is(ph, Term::Neutral)), Term::Favorable),
            Rule::new(
                is(temp, Term::Low)
                    .and(is(ph, Term::Neutral))
                    .or(warm().and(off_neutral())),
                Term::Neutral,
            ),
            Rule::new(
                is(temp, Term::VeryLow).or(is(temp, Term::Low).and(off_neutral())),
                Term::Unfavorable,
            ),
        ],
        "TEMP" => vec![
            Rule::new(warm(), Term::Favorable),
            Rule::new(is(temp, Term::Low), Term::Neutral),
            Rule::new(is(temp, Term::VeryLow), Term::Unfavorable),
        ],
        _ => vec![
            Rule::new(is(ph, Term::Neutral), Term::Favorable),
            Rule::new(is(ph, Term::Alkaline), Term::Neutral),
            Rule::new(is(ph, Term::Acid), Term::Unfavorable),
        ],
    }
}

/// Additional conditions indicator.
pub struct AdditionalConditions {
    model: IndicatorModel,
}

impl AdditionalConditions {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::AdditionalConditions;
        let resolver = Resolver::new(
            kind,
            keys(&PRIORITY),
            vec![
                Strategy::joint("TEMP_pH", keys(&[Temp, Ph]), 1.0),
                Strategy::direct("TEMP", Temp, 0.5),
                Strategy::direct("pH", Ph, 0.25),
            ],
        );

        let model = IndicatorModel::new(
            kind,
            resolver,
            &inputs(),
            output(),
            settings.clamp_inputs,
            |strategy| rules(strategy.method),
        );
        Self { model }
    }
}

impl Indicator for AdditionalConditions {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Evidence;
    use crate::types::{IndicatorResult, Measurements};
    use std::collections::BTreeMap;

    fn evaluate(m: &Measurements) -> IndicatorResult {
        let upstream = BTreeMap::new();
        AdditionalConditions::new(&EngineSettings::default())
            .evaluate(&Evidence::new(m, &upstream))
            .expect("additional conditions resolve")
    }

    #[test]
    fn test_warm_neutral_water_is_favorable() {
        let r = evaluate(&Measurements::new().with(Temp, 22.0).with(Ph, 7.2));
        assert_eq!(r.calculation_method, Some("TEMP_pH"));
        assert_eq!(r.label, Some(Term::Favorable));
        assert_eq!(r.confidence, 1.0);
        let value = r.value.expect("defined");
        assert!(value > 0.8 && value < 0.86, "got {value}");
    }

    #[test]
    fn test_cold_water_is_unfavorable() {
        let r = evaluate(&Measurements::new().with(Temp, 2.0).with(Ph, 7.0));
        assert_eq!(r.label, Some(Term::Unfavorable));
    }

    #[test]
    fn test_single_input_confidences() {
        let temp_only = evaluate(&Measurements::new().with(Temp, 18.0));
        assert_eq!(temp_only.calculation_method, Some("TEMP"));
        assert_eq!(temp_only.confidence, 0.5);
        assert_eq!(temp_only.label, Some(Term::Favorable));

        let ph_only = evaluate(&Measurements::new().with(Ph, 9.5));
        assert_eq!(ph_only.calculation_method, Some("pH"));
        assert_eq!(ph_only.confidence, 0.25);
        assert_eq!(ph_only.label, Some(Term::Neutral));
    }

    #[test]
    fn test_ph_below_scale_is_clipped_to_acid() {
        let r = evaluate(&Measurements::new().with(Ph, 3.5));
        assert_eq!(r.label, Some(Term::Unfavorable));
    }
}
