//! Solids level from total solids or complementary solid fractions.

use super::{keys, Indicator, IndicatorModel, LEVELS};
use crate::engine::EngineSettings;
use crate::fuzzy::{pass_through, FuzzyVariable, Universe};
use crate::resolver::{Resolver, Strategy};
use crate::types::IndicatorKind;
use crate::types::MeasurementCode::{self, Fds, Fs, Tds, Ts, Tss, Vds, Vs};

/// Measurements considered, most trusted first.
pub const PRIORITY: [MeasurementCode; 7] = [Ts, Tds, Tss, Fds, Vds, Fs, Vs];

const CONFIDENCE: f64 = 1.0;

/// Output scale, shared as an antecedent by the physical conditions.
pub fn output() -> FuzzyVariable {
    FuzzyVariable::four_level(
        IndicatorKind::SolidsLevel.key(),
        Universe::unit(),
        [0.0, 0.0, 0.2, 0.4],
        [0.3, 0.5, 0.7],
        [0.6, 0.75, 0.9],
        [0.85, 0.95, 1.0, 1.0],
    )
}

fn inputs() -> Vec<FuzzyVariable> {
    let fraction = |name| {
        FuzzyVariable::four_level(name, Universe::new(0.0, 1000.0, 1.0), [0.0, 0.0, 100.0, 250.0], [200.0, 350.0, 500.0], [450.0, 600.0, 750.0], [700.0, 850.0, 1000.0, 1000.0])
    };

    vec![
        FuzzyVariable::four_level(Ts.code(), Universe::new(0.0, 2000.0, 1.0), [0.0, 0.0, 200.0, 500.0], [400.0, 700.0, 1000.0], [900.0, 1200.0, 1500.0], [1400.0, 1700.0, 2000.0, 2000.0]),
        FuzzyVariable::four_level(Tds.code(), Universe::new(0.0, 1500.0, 1.0), [0.0, 0.0, 150.0, 300.0], [250.0, 500.0, 750.0], [700.0, 900.0, 1100.0], [1000.0, 1250.0, 1500.0, 1500.0]),
        FuzzyVariable::four_level(Tss.code(), Universe::new(0.0, 500.0, 0.1), [0.0, 0.0, 20.0, 50.0], [40.0, 100.0, 200.0], [150.0, 250.0, 350.0], [300.0, 400.0, 500.0, 500.0]),
        fraction(Fds.code()),
        fraction(Vds.code()),
        fraction(Fs.code()),
        fraction(Vs.code()),
    ]
}

/// Solids level indicator.
pub struct SolidsLevel {
    model: IndicatorModel,
}

impl SolidsLevel {
    pub fn new(settings: &EngineSettings) -> Self {
        let kind = IndicatorKind::SolidsLevel;
        // Dissolved fractions are tried before the fixed/volatile split of
        // total solids, and FDS + VDS stands in for TDS.
        let resolver = Resolver::new(
            kind,
            keys(&PRIORITY),
            vec![
                Strategy::direct("TS", Ts, CONFIDENCE),
                Strategy::derived_sum("TDS_TSS", [Tds.into(), Tss.into()], Ts, CONFIDENCE),
                Strategy::derived_sum("FS_VS", [Fs.into(), Vs.into()], Ts, CONFIDENCE),
                Strategy::direct("TDS", Tds, CONFIDENCE),
                Strategy::direct("TSS", Tss, CONFIDENCE),
                Strategy::derived_sum("FDS_VDS", [Fds.into(), Vds.into()], Tds, CONFIDENCE),
                Strategy::direct("FDS", Fds, CONFIDENCE),
                Strategy::direct("VDS", Vds, CONFIDENCE),
                Strategy::direct("FS", Fs, CONFIDENCE),
                Strategy::direct("VS", Vs, CONFIDENCE),
            ],
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

impl Indicator for SolidsLevel {
    fn model(&self) -> &IndicatorModel {
        &self.model
    }
}
