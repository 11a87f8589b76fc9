//! Physical conditions: solids level combined with visibility level.

use super::{solids, Indicator, IndicatorModel};
use crate::engine::EngineSettings;
use crate::fuzzy::{is, is_any, pass_through, FuzzyVariable, MembershipFunction, Rule, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::{IndicatorKind, InputKey, Term};

const SOLIDS: IndicatorKind = IndicatorKind::SolidsLevel;
const VISIBILITY: IndicatorKind = IndicatorKind::VisibilityLevel;

/// Output scale, shared as an antecedent by the eutrophication level.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::new(
        IndicatorKind::PhysicalConditions.key(),
        Universe::unit(),
        [
            (Term::Good, MembershipFunction::Trapezoid([0.0, 0.0, 0.2, 0.3])),
            (Term::Neutral, MembershipFunction::Triangle([0.25, 0.4, 0.55])),
            (Term::Bad, MembershipFunction::Triangle([0.5, 0.65, 0.8])),
            (Term::VeryBad, MembershipFunction::Trapezoid([0.75, 0.85, 1.0, 1.0])),
        ],
    )
}

/// Visibility as read by this indicator: a symmetric four-level scale,
/// narrower at the top than the visibility output itself.
fn visibility_scale() -> FuzzyVariable {
    FuzzyVariable::four_level(
        VISIBILITY.key(),
        Universe::unit(),
        [0.0, 0.0, 0.2, 0.4],
        [0.3, 0.5, 0.7],
        [0.6, 0.75, 0.9],
        [0.85, 0.95, 1.0, 1.0],
    )
}

fn combined() -> Vec<Rule> {
    use Term::{Bad, Good, High, Low, Moderate, Neutral, VeryBad, VeryHigh};

    let (s, v) = (SOLIDS.key(), VISIBILITY.key());
    vec![
        Rule::new(is(v, VeryHigh).and(is_any(s, &[Low, Moderate])), Good),
        Rule::new(is(v, VeryHigh).and(is_any(s, &[High, VeryHigh])), Neutral),
        Rule::new(is(v, High).and(is(s, Low)), Good),
        Rule::new(is(v, High).and(is_any(s, &[Moderate, High, VeryHigh])), Neutral),
        Rule::new(is(v, Moderate).and(is_any(s, &[Low, Moderate])), Neutral),
        Rule::new(is(v, Moderate).and(is_any(s, &[High, VeryHigh])), Bad),
        Rule::new(is(v, Low).and(is(s, Low)), Neutral),
        Rule::new(is(v, Low).and(is_any(s, &[Moderate, High])), Bad),
        Rule::new(is(v, Low).and(is(s, VeryHigh)), VeryBad),
    ]
}

/// Physical conditions indicator.
pub struct PhysicalConditions {
    model: IndicatorModel,
}

impl PhysicalConditions {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::PhysicalConditions;
        let priority: Vec<InputKey> = vec![SOLIDS.into(), VISIBILITY.into()];
        let resolver = Resolver::new(
            kind,
            priority.clone(),
            vec![
                Strategy::joint("SOLIDS_VISIBILITY", priority, 1.0),
                Strategy::direct("SOLIDS", SOLIDS, 0.5),
                Strategy::direct("VISIBILITY", VISIBILITY, 0.5),
            ],
        );

        let model = IndicatorModel::new(
            kind,
            resolver,
            &[solids::output(), visibility_scale()],
            output(),
            settings.clamp_inputs,
            |strategy| match strategy.method {
                "SOLIDS" => pass_through(
                    SOLIDS.key(),
                    &[
                        (Term::Low, Term::Good),
                        (Term::Moderate, Term::Neutral),
                        (Term::High, Term::Bad),
                        (Term::VeryHigh, Term::VeryBad),
                    ],
                ),
                "VISIBILITY" => pass_through(
                    VISIBILITY.key(),
                    &[
                        (Term::VeryHigh, Term::Good),
                        (Term::High, Term::Neutral),
                        (Term::Moderate, Term::Bad),
                        (Term::Low, Term::VeryBad),
                    ],
                ),
                _ => combined(),
            },
        );
        Self { model }
    }
}

impl Indicator for PhysicalConditions {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}
