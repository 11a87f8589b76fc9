//! Visibility level from transparency (Secchi depth) and turbidity.
//!
//! Turbidity reads inverted: a turbid sample has low visibility.

use super::{keys, Indicator, IndicatorModel, LEVELS};
use crate::engine::EngineSettings;
use crate::fuzzy::{is, is_any, pass_through, FuzzyVariable, MembershipFunction, Rule, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::MeasurementCode::{self, Trans, Turb};
use crate::types::{IndicatorKind, Term};

/// Measurements considered, most trusted first.
pub const PRIORITY: [MeasurementCode; 2] = [Trans, Turb];

const CONFIDENCE: f64 = 1.0;

const TURBIDITY: [(Term, Term); 4] = [
    (Term::Low, Term::VeryHigh),
    (Term::Moderate, Term::High),
    (Term::High, Term::Moderate),
    (Term::VeryHigh, Term::Low),
];

pub fn output() -> FuzzyVariable {
    FuzzyVariable::new(
        IndicatorKind::VisibilityLevel.key(),
        Universe::unit(),
        [
            (Term::Low, MembershipFunction::Trapezoid([0.0, 0.0, 0.2, 0.4])),
            (Term::Moderate, MembershipFunction::Triangle([0.3, 0.5, 0.7])),
            (Term::High, MembershipFunction::Triangle([0.6, 0.8, 0.95])),
            (Term::VeryHigh, MembershipFunction::Trapezoid([0.9, 0.95, 1.0, 1.0])),
        ],
    )
}

fn inputs() -> Vec<FuzzyVariable> {
    vec![
        FuzzyVariable::four_level(Trans.code(), Universe::new(0.0, 10.0, 0.1), [0.0, 0.0, 0.25, 0.6], [0.5, 1.25, 2.1], [2.0, 3.0, 4.1], [4.0, 5.0, 10.0, 10.0]),
        FuzzyVariable::four_level(Turb.code(), Universe::new(0.0, 100.0, 0.1), [0.0, 0.0, 5.0, 15.0], [10.0, 30.0, 50.0], [40.0, 60.0, 80.0], [70.0, 90.0, 100.0, 100.0]),
    ]
}

fn combined() -> Vec<Rule> {
    let (trans, turb) = (Trans.code(), Turb.code());
    vec![
        Rule::new(is(trans, Term::VeryHigh).and(is(turb, Term::Low)), Term::VeryHigh),
        Rule::new(is(trans, Term::High).and(is(turb, Term::Low)), Term::High),
        Rule::new(is(trans, Term::Moderate).or(is(turb, Term::Moderate)), Term::Moderate),
        Rule::new(
            is(trans, Term::Low).or(is_any(turb, &[Term::High, Term::VeryHigh])),
            Term::Low,
        ),
    ]
}

/// Visibility level indicator.
pub struct VisibilityLevel {
    model: IndicatorModel,
}

impl VisibilityLevel {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::VisibilityLevel;
        let resolver = Resolver::new(
            kind,
            keys(&PRIORITY),
            vec![
                Strategy::direct("TRANS", Trans, CONFIDENCE),
                Strategy::direct("TURB", Turb, CONFIDENCE),
                Strategy::joint("TRANS_TURB", keys(&[Trans, Turb]), CONFIDENCE),
            ],
        );

        let model = IndicatorModel::new(
            kind,
            resolver,
            &inputs(),
            output(),
            settings.clamp_inputs,
            |strategy| match strategy.method {
                "TRANS_TURB" => combined(),
                "TURB" => pass_through(Turb.code(), &TURBIDITY),
                _ => pass_through(Trans.code(), &LEVELS),
            },
        );
        Self { model }
    }
}

impl Indicator for VisibilityLevel {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}
