//! Nitrogen level from total nitrogen or its fractions.

use super::{keys, Indicator, IndicatorModel, LEVELS};
use crate::engine::EngineSettings;
use crate::fuzzy::{pass_through, FuzzyVariable, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::IndicatorKind;
use crate::types::MeasurementCode::{
    self, Din, Dkn, Don, Nh3n, Nh4n, No2n, No3n, NoxN, Pn, Pon, Tdn, Tkn, Tn, Ton,
};

/// Measurements considered, most trusted first.
pub const PRIORITY: [MeasurementCode; 14] = [
    Tn, Tdn, Tkn, Din, NoxN, Nh4n, No3n, No2n, Dkn, Nh3n, Don, Pn, Pon, Ton,
];

const CONFIDENCE: f64 = 1.0;

/// Output scale, shared as an antecedent by the nutrient level.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::four_level(
        IndicatorKind::NitrogenLevel.key(),
        Universe::unit(),
        [0.0, 0.0, 0.15, 0.3],
        [0.25, 0.4, 0.55],
        [0.5, 0.65, 0.8],
        [0.75, 0.85, 1.0, 1.0],
    )
}

fn inputs() -> Vec<FuzzyVariable> {
    let u5 = Universe::new(0.0, 5.0, 0.1);
    let u10 = Universe::new(0.0, 10.0, 0.1);
    let u1 = Universe::new(0.0, 1.0, 0.01);

    let inorganic = |name| {
        FuzzyVariable::four_level(name, u5, [0.0, 0.0, 0.2, 0.5], [0.3, 0.8, 1.3], [1.0, 1.8, 2.5], [2.0, 3.0, 5.0, 5.0])
    };
    let organic = |name| {
        FuzzyVariable::four_level(name, u5, [0.0, 0.0, 0.1, 0.3], [0.2, 0.5, 1.0], [0.8, 1.5, 2.5], [2.0, 3.5, 5.0, 5.0])
    };
    let oxidized = |name| {
        FuzzyVariable::four_level(name, u10, [0.0, 0.0, 0.5, 1.0], [0.8, 2.0, 3.5], [3.0, 5.0, 7.0], [6.5, 8.0, 10.0, 10.0])
    };
    let total = |name| {
        FuzzyVariable::four_level(name, u10, [0.0, 0.0, 0.5, 1.0], [0.5, 1.5, 2.5], [2.0, 3.5, 5.0], [4.5, 7.0, 10.0, 10.0])
    };

    vec![
        total(Tn.code()),
        total(Tdn.code()),
        FuzzyVariable::four_level(Tkn.code(), u10, [0.0, 0.0, 0.3, 0.8], [0.5, 1.5, 2.5], [2.0, 3.5, 5.0], [4.5, 7.0, 10.0, 10.0]),
        inorganic(Din.code()),
        inorganic(Dkn.code()),
        oxidized(NoxN.code()),
        oxidized(No3n.code()),
        FuzzyVariable::four_level(Nh4n.code(), Universe::new(0.0, 2.0, 0.1), [0.0, 0.0, 0.05, 0.1], [0.08, 0.2, 0.4], [0.3, 0.6, 1.0], [0.8, 1.5, 2.0, 2.0]),
        FuzzyVariable::four_level(No2n.code(), u1, [0.0, 0.0, 0.01, 0.03], [0.02, 0.05, 0.1], [0.08, 0.2, 0.4], [0.35, 0.6, 1.0, 1.0]),
        FuzzyVariable::four_level(Nh3n.code(), u1, [0.0, 0.0, 0.02, 0.05], [0.03, 0.1, 0.2], [0.15, 0.3, 0.5], [0.4, 0.6, 1.0, 1.0]),
        organic(Don.code()),
        organic(Pn.code()),
        organic(Pon.code()),
        organic(Ton.code()),
    ]
}

/// Nitrogen level indicator.
pub struct NitrogenLevel {
    model: IndicatorModel,
}

impl NitrogenLevel {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::NitrogenLevel;
        let resolver = Resolver::with_single_fallbacks(
            kind,
            keys(&PRIORITY),
            vec![
                Strategy::direct("TN", Tn, CONFIDENCE),
                Strategy::derived_sum("TDN_PN", [Tdn.into(), Pn.into()], Tn, CONFIDENCE),
                Strategy::derived_sum("TKN_NOxN", [Tkn.into(), NoxN.into()], Tn, CONFIDENCE),
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

impl Indicator for NitrogenLevel {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}
