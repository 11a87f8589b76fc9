//! Oxygen balance from dissolved oxygen or oxygen demand.
//!
//! Dissolved oxygen reads on an inverted scale: more oxygen is a better
//! balance. Oxygen demands (BOD, COD, PV) read directly: more demand is worse.

use super::{keys, Indicator, IndicatorModel};
use crate::engine::EngineSettings;
use crate::fuzzy::{is, pass_through, FuzzyVariable, MembershipFunction, Rule, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::MeasurementCode::{self, Bod, Cod, O2Dis, Pv};
use crate::types::{IndicatorKind, Term};

/// Measurements considered, most trusted first.
pub const PRIORITY: [MeasurementCode; 4] = [O2Dis, Bod, Cod, Pv];

const CONFIDENCE: f64 = 1.0;

const DEMAND: [(Term, Term); 4] = [
    (Term::Low, Term::Good),
    (Term::Moderate, Term::Moderate),
    (Term::High, Term::Bad),
    (Term::VeryHigh, Term::VeryBad),
];

const DISSOLVED: [(Term, Term); 4] = [
    (Term::Low, Term::VeryBad),
    (Term::Moderate, Term::Bad),
    (Term::High, Term::Moderate),
    (Term::VeryHigh, Term::Good),
];

/// Output scale, shared as an antecedent by the chemical conditions.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::new(
        IndicatorKind::OxygenBalance.key(),
        Universe::unit(),
        [
            (Term::Good, MembershipFunction::Trapezoid([0.0, 0.0, 0.2, 0.4])),
            (Term::Moderate, MembershipFunction::Triangle([0.3, 0.5, 0.7])),
            (Term::Bad, MembershipFunction::Triangle([0.6, 0.75, 0.9])),
            (Term::VeryBad, MembershipFunction::Trapezoid([0.85, 0.95, 1.0, 1.0])),
        ],
    )
}

fn inputs() -> Vec<FuzzyVariable> {
    vec![
        FuzzyVariable::four_level(O2Dis.code(), Universe::new(0.0, 15.0, 0.1), [0.0, 0.0, 2.0, 5.0], [4.0, 6.0, 8.0], [7.0, 9.0, 11.0], [10.0, 12.0, 15.0, 15.0]),
        FuzzyVariable::four_level(Bod.code(), Universe::new(0.0, 30.0, 0.1), [0.0, 0.0, 2.0, 5.0], [4.0, 7.0, 10.0], [9.0, 15.0, 20.0], [18.0, 25.0, 30.0, 30.0]),
        FuzzyVariable::four_level(Cod.code(), Universe::new(0.0, 100.0, 0.1), [0.0, 0.0, 5.0, 15.0], [10.0, 25.0, 40.0], [35.0, 55.0, 75.0], [70.0, 85.0, 100.0, 100.0]),
        FuzzyVariable::four_level(Pv.code(), Universe::new(0.0, 50.0, 0.1), [0.0, 0.0, 2.0, 8.0], [6.0, 12.0, 20.0], [18.0, 25.0, 35.0], [30.0, 40.0, 50.0, 50.0]),
    ]
}

/// BOD paired with a second demand: both must be low for a good balance,
/// either one elevated is enough to degrade it.
fn paired_demand(second: &'static str) -> Vec<Rule> {
    let bod = Bod.code();
    vec![
        Rule::new(is(bod, Term::Low).and(is(second, Term::Low)), Term::Good),
        Rule::new(is(bod, Term::Moderate).or(is(second, Term::Moderate)), Term::Moderate),
        Rule::new(is(bod, Term::High).or(is(second, Term::High)), Term::Bad),
        Rule::new(is(bod, Term::VeryHigh).or(is(second, Term::VeryHigh)), Term::VeryBad),
    ]
}

/// Oxygen balance indicator.
pub struct OxygenBalance {
    model: IndicatorModel,
}

impl OxygenBalance {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::OxygenBalance;
        let resolver = Resolver::with_single_fallbacks(
            kind,
            keys(&PRIORITY),
            vec![
                Strategy::direct("O2_Dis", O2Dis, CONFIDENCE),
                Strategy::joint("BOD_COD", keys(&[Bod, Cod]), CONFIDENCE),
                Strategy::joint("BOD_PV", keys(&[Bod, Pv]), CONFIDENCE),
            ],
            CONFIDENCE,
        );

        let model = IndicatorModel::new(
            kind,
            resolver,
            &inputs(),
            output(),
            settings.clamp_inputs,
            |strategy| match strategy.method {
                "O2_Dis" => pass_through(O2Dis.code(), &DISSOLVED),
                "BOD_COD" => paired_demand(Cod.code()),
                "BOD_PV" => paired_demand(Pv.code()),
                single => pass_through(single, &DEMAND),
            },
        );
        Self { model }
    }
}

impl Indicator for OxygenBalance {
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
        OxygenBalance::new(&EngineSettings::default())
            .evaluate(&Evidence::new(m, &upstream))
            .expect("oxygen resolves")
    }

    #[test]
    fn test_dissolved_oxygen_is_inverted() {
        let saturated = evaluate(&Measurements::new().with(O2Dis, 13.0));
        assert_eq!(saturated.label, Some(Term::Good));

        let hypoxic = evaluate(&Measurements::new().with(O2Dis, 1.0));
        assert_eq!(hypoxic.label, Some(Term::VeryBad));
    }

    #[test]
    fn test_dissolved_oxygen_preferred_over_demand() {
        let r = evaluate(&Measurements::new().with(O2Dis, 9.0).with(Bod, 25.0).with(Cod, 90.0));
        assert_eq!(r.calculation_method, Some("O2_Dis"));
    }

    #[test]
    fn test_demand_pair() {
        let r = evaluate(&Measurements::new().with(Bod, 1.0).with(Cod, 3.0));
        assert_eq!(r.calculation_method, Some("BOD_COD"));
        assert_eq!(r.label, Some(Term::Good));

        let r = evaluate(&Measurements::new().with(Bod, 1.0).with(Pv, 45.0));
        assert_eq!(r.calculation_method, Some("BOD_PV"));
        assert_eq!(r.label, Some(Term::VeryBad));
    }

    #[test]
    fn test_single_demand_fallback() {
        let r = evaluate(&Measurements::new().with(Cod, 55.0));
        assert_eq!(r.calculation_method, Some("COD"));
        assert_eq!(r.label, Some(Term::Bad));
    }
}
