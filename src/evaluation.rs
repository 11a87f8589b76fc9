//! Cross-check of engine output against Carlson's Trophic State Index.
//!
//! Three indices are computed from the raw sample where the input is
//! positive:
//!
//! | Index  | Formula                          | Input unit |
//! |--------|----------------------------------|------------|
//! | SD     | 60 − 14.41 · ln(SD)              | m          |
//! | Chl-a  | 9.81 · ln(Chl-a) + 30.6          | µg/l       |
//! | TP     | 14.42 · ln(TP) + 4.15            | µg/l       |
//!
//! Chl-a and TP are measured in mg/l and scaled by 1000 first.

use crate::types::{Chain, IndicatorResult, MeasurementCode, Measurements, Term};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Trophic State Index
// ============================================================================

/// The three Carlson indices, in the order they are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TsiIndex {
    #[serde(rename = "Chl-a")]
    Chlorophyll,
    #[serde(rename = "TP")]
    Phosphorus,
    #[serde(rename = "SD")]
    Secchi,
}

impl TsiIndex {
    pub const ORDER: [Self; 3] = [Self::Chlorophyll, Self::Phosphorus, Self::Secchi];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chlorophyll => "Chl-a",
            Self::Phosphorus => "TP",
            Self::Secchi => "SD",
        }
    }
}

impl std::fmt::Display for TsiIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn positive(x: f64) -> Option<f64> {
    (x.is_finite() && x > 0.0).then_some(x)
}

/// TSI from Secchi depth in metres.
pub fn tsi_secchi(depth_m: f64) -> Option<f64> {
    positive(depth_m).map(|sd| 14.41f64.mul_add(-sd.ln(), 60.0))
}

/// TSI from chlorophyll-a in µg/l.
pub fn tsi_chlorophyll(chl_ug_l: f64) -> Option<f64> {
    positive(chl_ug_l).map(|chl| 9.81f64.mul_add(chl.ln(), 30.6))
}

/// TSI from total phosphorus in µg/l.
pub fn tsi_phosphorus(tp_ug_l: f64) -> Option<f64> {
    positive(tp_ug_l).map(|tp| 14.42f64.mul_add(tp.ln(), 4.15))
}

/// Trophic state of a TSI value.
pub fn trophic_level(tsi: f64) -> Term {
    if tsi < 40.0 {
        Term::Oligotrophic
    } else if tsi < 50.0 {
        Term::Mesotrophic
    } else if tsi < 70.0 {
        Term::Eutrophic
    } else {
        Term::Hypereutrophic
    }
}

/// TSI values of one sample. `None` where the input is missing or not
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrophicStateIndex {
    pub chlorophyll: Option<f64>,
    pub phosphorus: Option<f64>,
    pub secchi: Option<f64>,
}

impl TrophicStateIndex {
    pub fn from_measurements(m: &Measurements) -> Self {
        Self {
            chlorophyll: m
                .get(MeasurementCode::ChlA)
                .and_then(|mg| tsi_chlorophyll(mg * 1000.0)),
            phosphorus: m
                .get(MeasurementCode::Tp)
                .and_then(|mg| tsi_phosphorus(mg * 1000.0)),
            secchi: m.get(MeasurementCode::Trans).and_then(tsi_secchi),
        }
    }

    pub const fn value(&self, index: TsiIndex) -> Option<f64> {
        match index {
            TsiIndex::Chlorophyll => self.chlorophyll,
            TsiIndex::Phosphorus => self.phosphorus,
            TsiIndex::Secchi => self.secchi,
        }
    }

    pub fn level(&self, index: TsiIndex) -> Option<Term> {
        self.value(index).map(trophic_level)
    }

    pub const fn is_empty(&self) -> bool {
        self.chlorophyll.is_none() && self.phosphorus.is_none() && self.secchi.is_none()
    }

    /// First index, in consultation order, whose level equals `label`.
    pub fn agreeing_index(&self, label: Term) -> Option<TsiIndex> {
        TsiIndex::ORDER
            .into_iter()
            .find(|&i| self.level(i) == Some(label))
    }

    /// Level of the first available index.
    pub fn reference_level(&self) -> Option<Term> {
        TsiIndex::ORDER.into_iter().find_map(|i| self.level(i))
    }
}

// ============================================================================
// Report
// ============================================================================

/// Verdict on the engine's agreement rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aptitude {
    Insufficient,
    Acceptable,
    Good,
    Excellent,
}

impl Aptitude {
    pub fn from_precision(precision: f64) -> Self {
        if precision >= 0.9 {
            Self::Excellent
        } else if precision >= 0.75 {
            Self::Good
        } else if precision >= 0.5 {
            Self::Acceptable
        } else {
            Self::Insufficient
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insufficient => "INSUFFICIENT",
            Self::Acceptable => "ACCEPTABLE",
            Self::Good => "GOOD",
            Self::Excellent => "EXCELLENT",
        }
    }
}

/// One evaluated row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowOutcome {
    /// Position in the input batch.
    pub row: usize,
    pub tsi: TrophicStateIndex,
    /// Eutrophication label produced by the engine.
    pub inferred: Term,
    /// `inferred` when it matched, otherwise the first available TSI level.
    pub reference: Term,
    /// Index that agreed with the engine, `None` on a mismatch.
    pub matched: Option<TsiIndex>,
}

impl RowOutcome {
    pub const fn is_exact(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub rows: Vec<RowOutcome>,
    /// Rows with a TSI and a defined engine label.
    pub real: usize,
    pub exact: usize,
    /// `exact / real` rounded to 3 decimals, 0 when no row qualified.
    pub precision: f64,
    pub aptitude: Aptitude,
    pub generated_at: DateTime<Utc>,
}

impl EvaluationReport {
    pub const fn fails(&self) -> usize {
        self.real - self.exact
    }
}

/// Compare each chain's eutrophication label with the TSI levels of its
/// sample.
///
/// `chains[i]` must be the engine output for `rows[i]`, as returned by
/// [`Engine::infer_batch`](crate::Engine::infer_batch); the two slices must
/// have the same length.
pub fn evaluate(rows: &[Measurements], chains: &[Chain]) -> EvaluationReport {
    debug_assert_eq!(
        rows.len(),
        chains.len(),
        "evaluate needs exactly one chain per row"
    );
    let outcomes: Vec<RowOutcome> = rows
        .iter()
        .zip(chains)
        .enumerate()
        .filter_map(|(row, (m, chain))| {
            let tsi = TrophicStateIndex::from_measurements(m);
            if tsi.is_empty() {
                return None;
            }
            let inferred = chain.eutrophication().and_then(|r: &IndicatorResult| r.label)?;
            let matched = tsi.agreeing_index(inferred);
            let reference = if matched.is_some() {
                inferred
            } else {
                tsi.reference_level()?
            };
            Some(RowOutcome {
                row,
                tsi,
                inferred,
                reference,
                matched,
            })
        })
        .collect();

    let real = outcomes.len();
    let exact = outcomes.iter().filter(|o| o.is_exact()).count();
    let precision = if real == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let ratio = exact as f64 / real as f64;
        (ratio * 1000.0).round() / 1000.0
    };
    let aptitude = Aptitude::from_precision(precision);

    info!(real, exact, precision, aptitude = aptitude.as_str(), "TSI evaluation complete");

    EvaluationReport {
        rows: outcomes,
        real,
        exact,
        precision,
        aptitude,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndicatorKind;
    use crate::types::MeasurementCode::{ChlA, Tp, Trans};

    fn chain_labelled(label: Option<Term>) -> Chain {
        let mut chain = Chain::empty(4);
        if let Some(label) = label {
            chain.results.insert(
                IndicatorKind::EutrophicationLevel,
                IndicatorResult {
                    value: Some(0.5),
                    label: Some(label),
                    confidence: 1.0,
                    ..IndicatorResult::undefined()
                },
            );
        }
        chain
    }

    #[test]
    fn test_index_formulas() {
        assert!((tsi_secchi(1.0).expect("positive") - 60.0).abs() < 1e-12);
        let chl = tsi_chlorophyll(10.0).expect("positive");
        assert!((chl - 53.188).abs() < 1e-3, "got {chl}");
        let tp = tsi_phosphorus(20.0).expect("positive");
        assert!((tp - 47.349).abs() < 1e-3, "got {tp}");
        assert_eq!(tsi_secchi(0.0), None);
        assert_eq!(tsi_phosphorus(-1.0), None);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(trophic_level(39.99), Term::Oligotrophic);
        assert_eq!(trophic_level(40.0), Term::Mesotrophic);
        assert_eq!(trophic_level(50.0), Term::Eutrophic);
        assert_eq!(trophic_level(70.0), Term::Hypereutrophic);
    }

    #[test]
    fn test_aptitude_thresholds() {
        assert_eq!(Aptitude::from_precision(0.499), Aptitude::Insufficient);
        assert_eq!(Aptitude::from_precision(0.5), Aptitude::Acceptable);
        assert_eq!(Aptitude::from_precision(0.75), Aptitude::Good);
        assert_eq!(Aptitude::from_precision(0.9), Aptitude::Excellent);
    }

    #[test]
    fn test_any_agreeing_index_counts() {
        // Chl-a reads eutrophic, TP mesotrophic.
        let tsi = TrophicStateIndex::from_measurements(
            &Measurements::new().with(ChlA, 0.01).with(Tp, 0.02),
        );
        assert_eq!(tsi.agreeing_index(Term::Mesotrophic), Some(TsiIndex::Phosphorus));
        assert_eq!(tsi.agreeing_index(Term::Eutrophic), Some(TsiIndex::Chlorophyll));
        assert_eq!(tsi.reference_level(), Some(Term::Eutrophic));
    }

    #[test]
    fn test_report_skips_rows_without_index_or_label() {
        let rows = vec![
            Measurements::new().with(ChlA, 0.01).with(Tp, 0.02),
            Measurements::new(),
            Measurements::new().with(Trans, 1.0),
            Measurements::new().with(Tp, 0.002),
        ];
        let chains = vec![
            chain_labelled(Some(Term::Mesotrophic)),
            chain_labelled(Some(Term::Eutrophic)),
            chain_labelled(None),
            chain_labelled(Some(Term::Hypereutrophic)),
        ];

        let report = evaluate(&rows, &chains);
        assert_eq!(report.real, 2);
        assert_eq!(report.exact, 1);
        assert_eq!(report.fails(), 1);
        assert_eq!(report.precision, 0.5);
        assert_eq!(report.aptitude, Aptitude::Acceptable);

        assert_eq!(report.rows[0].row, 0);
        assert_eq!(report.rows[0].matched, Some(TsiIndex::Phosphorus));
        assert_eq!(report.rows[1].row, 3);
        assert_eq!(report.rows[1].matched, None);
        assert_eq!(report.rows[1].reference, Term::Oligotrophic);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "one chain per row")]
    fn test_unpaired_rows_are_rejected() {
        let rows = vec![Measurements::new().with(Tp, 0.02), Measurements::new().with(Tp, 0.05)];
        let chains = vec![chain_labelled(Some(Term::Mesotrophic))];
        let _ = evaluate(&rows, &chains);
    }

    #[test]
    fn test_empty_report() {
        let report = evaluate(&[], &[]);
        assert_eq!(report.real, 0);
        assert_eq!(report.precision, 0.0);
        assert_eq!(report.aptitude, Aptitude::Insufficient);
    }
}
