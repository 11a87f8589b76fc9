//! Eutrophication level: the trophic state of the water body, combining the
//! chemical, physical and additional conditions.
//!
//! Chemical conditions dominate. Physical conditions shift the state by up to
//! one step, and favourable additional conditions push it one step further.

use super::{additional, chemical, physical, Indicator, IndicatorModel};
use crate::engine::EngineSettings;
use crate::fuzzy::{is, is_any, pass_through, Antecedent, FuzzyVariable, MembershipFunction, Rule, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::{IndicatorKind, InputKey, Term};

const CHEMICAL: IndicatorKind = IndicatorKind::ChemicalConditions;
const PHYSICAL: IndicatorKind = IndicatorKind::PhysicalConditions;
const ADDITIONAL: IndicatorKind = IndicatorKind::AdditionalConditions;

const TROPHIC: [(Term, Term); 4] = [
    (Term::Good, Term::Oligotrophic),
    (Term::Neutral, Term::Mesotrophic),
    (Term::Bad, Term::Eutrophic),
    (Term::VeryBad, Term::Hypereutrophic),
];

pub fn output() -> FuzzyVariable {
    FuzzyVariable::new(
        IndicatorKind::EutrophicationLevel.key(),
        Universe::unit(),
        [
            (Term::Oligotrophic, MembershipFunction::Trapezoid([0.0, 0.0, 0.2, 0.3])),
            (Term::Mesotrophic, MembershipFunction::Triangle([0.25, 0.4, 0.55])),
            (Term::Eutrophic, MembershipFunction::Triangle([0.5, 0.65, 0.8])),
            (Term::Hypereutrophic, MembershipFunction::Trapezoid([0.75, 0.85, 1.0, 1.0])),
        ],
    )
}

/// Chemical-by-physical grid. Each row holds the chemical term, the physical
/// terms it covers, and the resulting state under unfavourable, neutral and
/// favourable additional conditions.
type GridRow = (Term, &'static [Term], [Term; 3]);

const GRID: [GridRow; 10] = {
    use Term::{Bad, Eutrophic as E, Good, Hypereutrophic as H, Mesotrophic as M, Neutral, Oligotrophic as O, VeryBad};
    [
        (Good, &[Good, Neutral, Bad], [O, O, M]),
        (Good, &[VeryBad], [O, M, E]),
        (Neutral, &[Good], [O, O, M]),
        (Neutral, &[Neutral], [O, M, E]),
        (Neutral, &[Bad, VeryBad], [M, E, H]),
        (Bad, &[Good], [O, M, E]),
        (Bad, &[Neutral, Bad], [M, E, H]),
        (Bad, &[VeryBad], [E, H, H]),
        (VeryBad, &[Good, Neutral], [M, E, H]),
        (VeryBad, &[Bad, VeryBad], [E, H, H]),
    ]
};

const ADDITIONAL_TERMS: [Term; 3] = [Term::Unfavorable, Term::Neutral, Term::Favorable];

fn chemical_physical(c: Term, physical_terms: &[Term]) -> Antecedent {
    is(CHEMICAL.key(), c).and(is_any(PHYSICAL.key(), physical_terms))
}

fn full_grid() -> Vec<Rule> {
    GRID.iter()
        .flat_map(|&(c, p, outcomes)| {
            ADDITIONAL_TERMS.iter().zip(outcomes).map(move |(&a, out)| {
                Rule::new(chemical_physical(c, p).and(is(ADDITIONAL.key(), a)), out)
            })
        })
        .collect()
}

/// Without additional conditions the neutral column applies.
fn chemical_physical_grid() -> Vec<Rule> {
    GRID.iter()
        .map(|&(c, p, outcomes)| Rule::new(chemical_physical(c, p), outcomes[1]))
        .collect()
}

/// Eutrophication level indicator.
pub struct EutrophicationLevel {
    model: IndicatorModel,
}

impl EutrophicationLevel {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::EutrophicationLevel;
        let priority: Vec<InputKey> = vec![CHEMICAL.into(), PHYSICAL.into(), ADDITIONAL.into()];
        let resolver = Resolver::new(
            kind,
            priority.clone(),
            vec![
                Strategy::joint("CHEMICAL_PHYSICAL_ADDITIONAL", priority, 1.0),
                Strategy::joint("CHEMICAL_PHYSICAL", vec![CHEMICAL.into(), PHYSICAL.into()], 0.9),
                Strategy::direct("CHEMICAL", CHEMICAL, 0.75),
                Strategy::direct("PHYSICAL", PHYSICAL, 0.4),
                Strategy::direct("ADDITIONAL", ADDITIONAL, 0.1),
            ],
        );

        let model = IndicatorModel::new(
            kind,
            resolver,
            &[chemical::output(), physical::output(), additional::output()],
            output(),
            settings.clamp_inputs,
            |strategy| match strategy.method {
                "CHEMICAL_PHYSICAL_ADDITIONAL" => full_grid(),
                "CHEMICAL_PHYSICAL" => chemical_physical_grid(),
                "CHEMICAL" => pass_through(CHEMICAL.key(), &TROPHIC),
                "PHYSICAL" => pass_through(PHYSICAL.key(), &TROPHIC),
                _ => pass_through(
                    ADDITIONAL.key(),
                    &[
                        (Term::Unfavorable, Term::Oligotrophic),
                        (Term::Neutral, Term::Mesotrophic),
                        (Term::Favorable, Term::Eutrophic),
                    ],
                ),
            },
        );
        Self { model }
    }
}

impl Indicator for EutrophicationLevel {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}
