//! Nutrient level: nitrogen level combined with phosphorus level.

use super::{nitrogen, phosphorus, Indicator, IndicatorModel, LEVELS};
use crate::engine::EngineSettings;
use crate::fuzzy::{is, pass_through, FuzzyVariable, Rule, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::{IndicatorKind, InputKey, Term};

const NITROGEN: IndicatorKind = IndicatorKind::NitrogenLevel;
const PHOSPHORUS: IndicatorKind = IndicatorKind::PhosphorusLevel;

/// Output scale, shared as an antecedent by the chemical conditions.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::four_level(
        IndicatorKind::NutrientLevel.key(),
        Universe::unit(),
        [0.0, 0.0, 0.2, 0.4],
        [0.3, 0.5, 0.7],
        [0.6, 0.75, 0.9],
        [0.85, 0.95, 1.0, 1.0],
    )
}

/// Nitrogen-by-phosphorus matrix. Symmetric: a pair of levels gives the
/// same output whichever nutrient carries which.
fn combined() -> Vec<Rule> {
    use Term::{High, Low, Moderate, VeryHigh};

    let (n, p) = (NITROGEN.key(), PHOSPHORUS.key());
    let both = |tn, tp| is(n, tn).and(is(p, tp));
    let either_way = |a, b| both(a, b).or(both(b, a));

    vec![
        Rule::new(both(Low, Low), Low),
        Rule::new(both(Moderate, Moderate), Moderate),
        Rule::new(both(High, High), VeryHigh),
        Rule::new(both(VeryHigh, VeryHigh), VeryHigh),
        Rule::new(either_way(High, Moderate), High),
        Rule::new(either_way(VeryHigh, High), VeryHigh),
        Rule::new(either_way(Moderate, Low), Moderate),
        Rule::new(either_way(High, Low), Moderate),
        Rule::new(either_way(VeryHigh, Low), Moderate),
        Rule::new(either_way(VeryHigh, Moderate), High),
    ]
}

/// Nutrient level indicator.
pub struct NutrientLevel {
    model: IndicatorModel,
}

impl NutrientLevel {
    /// With `nutrients_require_both` the level is only computed when both
    /// nitrogen and phosphorus are defined; otherwise either one alone is
    /// passed through at reduced confidence.
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::NutrientLevel;
        let priority: Vec<InputKey> = vec![NITROGEN.into(), PHOSPHORUS.into()];

        let mut strategies = vec![Strategy::joint("NITROGEN_PHOSPHORUS", priority.clone(), 1.0)];
        if !settings.nutrients_require_both {
            strategies.push(Strategy::direct("NITROGEN", NITROGEN, 0.5));
            strategies.push(Strategy::direct("PHOSPHORUS", PHOSPHORUS, 0.5));
        }
        let resolver = Resolver::new(kind, priority, strategies);

        let model = IndicatorModel::new(
            kind,
            resolver,
            &[nitrogen::output(), phosphorus::output()],
            output(),
            settings.clamp_inputs,
            |strategy| match strategy.method {
                "NITROGEN" => pass_through(NITROGEN.key(), &LEVELS),
                "PHOSPHORUS" => pass_through(PHOSPHORUS.key(), &LEVELS),
                _ => combined(),
            },
        );
        Self { model }
    }
}

impl Indicator for NutrientLevel {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}
