//! Chemical conditions: nutrient level combined with oxygen balance.

use super::{nutrients, oxygen, Indicator, IndicatorModel};
use crate::engine::EngineSettings;
use crate::fuzzy::{is, is_any, pass_through, FuzzyVariable, MembershipFunction, Rule, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::{IndicatorKind, InputKey, Term};

const NUTRIENTS: IndicatorKind = IndicatorKind::NutrientLevel;
const OXYGEN: IndicatorKind = IndicatorKind::OxygenBalance;

/// Output scale, shared as an antecedent by the eutrophication level.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::new(
        IndicatorKind::ChemicalConditions.key(),
        Universe::unit(),
        [
            (Term::Good, MembershipFunction::Trapezoid([0.0, 0.0, 0.2, 0.35])),
            (Term::Neutral, MembershipFunction::Triangle([0.3, 0.45, 0.6])),
            (Term::Bad, MembershipFunction::Triangle([0.55, 0.7, 0.85])),
            (Term::VeryBad, MembershipFunction::Trapezoid([0.8, 0.9, 1.0, 1.0])),
        ],
    )
}

fn combined() -> Vec<Rule> {
    use Term::{Bad, Good, High, Low, Moderate, Neutral, VeryBad, VeryHigh};

    let (n, o) = (NUTRIENTS.key(), OXYGEN.key());
    let rich = || is_any(n, &[High, VeryHigh]);
    let depleted = || is_any(o, &[Bad, VeryBad]);

    vec![
        Rule::new(is(n, Low).and(is_any(o, &[Good, Moderate])), Good),
        Rule::new(is(n, Low).and(depleted()), Neutral),
        Rule::new(is(n, Moderate).and(is_any(o, &[Good, Moderate])), Neutral),
        Rule::new(is(n, Moderate).and(depleted()), Bad),
        Rule::new(rich().and(is_any(o, &[Good, Moderate])), Bad),
        Rule::new(rich().and(depleted()), VeryBad),
    ]
}

/// Chemical conditions indicator.
pub struct ChemicalConditions {
    model: IndicatorModel,
}

impl ChemicalConditions {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::ChemicalConditions;
        let priority: Vec<InputKey> = vec![NUTRIENTS.into(), OXYGEN.into()];
        let resolver = Resolver::new(
            kind,
            priority.clone(),
            vec![
                Strategy::joint("NUTRIENTS_OXYGEN", priority, 1.0),
                Strategy::direct("NUTRIENTS", NUTRIENTS, 0.8),
                Strategy::direct("OXYGEN", OXYGEN, 0.3),
            ],
        );

        let model = IndicatorModel::new(
            kind,
            resolver,
            &[nutrients::output(), oxygen::output()],
            output(),
            settings.clamp_inputs,
            |strategy| match strategy.method {
                "NUTRIENTS" => pass_through(
                    NUTRIENTS.key(),
                    &[
                        (Term::Low, Term::Good),
                        (Term::Moderate, Term::Neutral),
                        (Term::High, Term::Bad),
                        (Term::VeryHigh, Term::VeryBad),
                    ],
                ),
                "OXYGEN" => pass_through(
                    OXYGEN.key(),
                    &[
                        (Term::Good, Term::Good),
                        (Term::Moderate, Term::Neutral),
                        (Term::Bad, Term::Bad),
                        (Term::VeryBad, Term::VeryBad),
                    ],
                ),
                _ => combined(),
            },
        );
        Self { model }
    }
}

impl Indicator for ChemicalConditions {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}
