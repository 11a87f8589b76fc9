//! Variable resolver
//!
//! Picks, per indicator and per sample, which of the available inputs to
//! trust. Selection is pure data: an ordered list of [`Strategy`] values is
//! scanned and the first one whose inputs are all present wins.
//!
//! ## Strategy sources
//!
//! - **Direct**: one input fed to its own fuzzy variable.
//! - **DerivedSum**: two complementary fractions added together and fed
//!   through the variable of the quantity they stand in for (TDN + PN as TN).
//! - **Joint**: several inputs fuzzified side by side into a multi-input
//!   rule base.

use crate::error::IndicatorError;
use crate::types::{IndicatorKind, InputKey, Measurements};
use std::collections::BTreeMap;

// ============================================================================
// Evidence
// ============================================================================

/// Everything an indicator may read for one sample.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub measurements: &'a Measurements,
    /// Crisp values of indicators from strictly earlier phases.
    pub upstream: &'a BTreeMap<IndicatorKind, f64>,
}

impl<'a> Evidence<'a> {
    pub const fn new(
        measurements: &'a Measurements,
        upstream: &'a BTreeMap<IndicatorKind, f64>,
    ) -> Self {
        Self {
            measurements,
            upstream,
        }
    }

    pub fn get(&self, key: InputKey) -> Option<f64> {
        match key {
            InputKey::Measurement(code) => self.measurements.get(code),
            InputKey::Indicator(kind) => self.upstream.get(&kind).copied(),
        }
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Where a strategy's crisp inputs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Direct(InputKey),
    DerivedSum { parts: [InputKey; 2], proxy: InputKey },
    Joint(Vec<InputKey>),
}

impl Source {
    /// Inputs that must all be present.
    pub fn required(&self) -> Vec<InputKey> {
        match self {
            Self::Direct(key) => vec![*key],
            Self::DerivedSum { parts, .. } => parts.to_vec(),
            Self::Joint(keys) => keys.clone(),
        }
    }

    /// Fuzzy variables the rule base is written against.
    pub fn variables(&self) -> Vec<InputKey> {
        match self {
            Self::Direct(key) => vec![*key],
            Self::DerivedSum { proxy, .. } => vec![*proxy],
            Self::Joint(keys) => keys.clone(),
        }
    }
}

/// One calculation branch: a tag, its inputs and its fixed confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub method: &'static str,
    pub source: Source,
    pub confidence: f64,
}

impl Strategy {
    pub fn direct(method: &'static str, key: impl Into<InputKey>, confidence: f64) -> Self {
        Self {
            method,
            source: Source::Direct(key.into()),
            confidence,
        }
    }

    pub fn derived_sum(
        method: &'static str,
        parts: [InputKey; 2],
        proxy: impl Into<InputKey>,
        confidence: f64,
    ) -> Self {
        Self {
            method,
            source: Source::DerivedSum {
                parts,
                proxy: proxy.into(),
            },
            confidence,
        }
    }

    pub fn joint(method: &'static str, keys: Vec<InputKey>, confidence: f64) -> Self {
        Self {
            method,
            source: Source::Joint(keys),
            confidence,
        }
    }
}

/// Selected strategy plus the crisp values it will feed to inference.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Position of the strategy in the resolver's list.
    pub index: usize,
    pub method: &'static str,
    pub confidence: f64,
    /// Inputs consumed, in strategy order.
    pub used: Vec<InputKey>,
    /// Crisp value per fuzzy variable name.
    pub crisp: Vec<(&'static str, f64)>,
}

// ============================================================================
// Resolver
// ============================================================================

/// Ordered strategy list restricted to an indicator's priority inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolver {
    indicator: IndicatorKind,
    priority: Vec<InputKey>,
    strategies: Vec<Strategy>,
}

impl Resolver {
    pub const fn new(
        indicator: IndicatorKind,
        priority: Vec<InputKey>,
        strategies: Vec<Strategy>,
    ) -> Self {
        Self {
            indicator,
            priority,
            strategies,
        }
    }

    /// Strategy order plus fallback: one direct strategy per priority input
    /// not already covered by a direct strategy, appended in priority order.
    pub fn with_single_fallbacks(
        indicator: IndicatorKind,
        priority: Vec<InputKey>,
        mut strategies: Vec<Strategy>,
        confidence: f64,
    ) -> Self {
        for key in &priority {
            let covered = strategies
                .iter()
                .any(|s| s.source == Source::Direct(*key));
            if !covered {
                strategies.push(Strategy::direct(key.name(), *key, confidence));
            }
        }
        Self::new(indicator, priority, strategies)
    }

    pub fn priority(&self) -> &[InputKey] {
        &self.priority
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Priority inputs with a usable value.
    pub fn available(&self, evidence: &Evidence<'_>) -> Vec<InputKey> {
        self.priority
            .iter()
            .copied()
            .filter(|k| evidence.get(*k).is_some())
            .collect()
    }

    /// Select the first strategy whose inputs are all present.
    pub fn resolve(&self, evidence: &Evidence<'_>) -> Result<Resolution, IndicatorError> {
        let available = self.available(evidence);
        if available.is_empty() {
            return Err(self.nothing_usable(evidence));
        }

        for (index, strategy) in self.strategies.iter().enumerate() {
            let required = strategy.source.required();
            if !required.iter().all(|k| available.contains(k)) {
                continue;
            }
            let values: Vec<f64> = required
                .iter()
                .filter_map(|k| evidence.get(*k))
                .collect();
            let crisp: Vec<(&'static str, f64)> = match &strategy.source {
                Source::DerivedSum { proxy, .. } => vec![(proxy.name(), values.iter().sum::<f64>())],
                Source::Direct(_) | Source::Joint(_) => required
                    .iter()
                    .map(|k| k.name())
                    .zip(values)
                    .collect(),
            };
            return Ok(Resolution {
                index,
                method: strategy.method,
                confidence: strategy.confidence,
                used: required,
                crisp,
            });
        }

        Err(self.nothing_usable(evidence))
    }

    fn nothing_usable(&self, evidence: &Evidence<'_>) -> IndicatorError {
        let from_upstream = self
            .priority
            .iter()
            .all(|k| matches!(k, InputKey::Indicator(_)));
        if from_upstream {
            IndicatorError::UpstreamUndefined {
                indicator: self.indicator,
                missing: self
                    .priority
                    .iter()
                    .copied()
                    .filter(|k| evidence.get(*k).is_none())
                    .collect(),
            }
        } else {
            IndicatorError::InsufficientInput {
                indicator: self.indicator,
                candidates: self.priority.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeasurementCode::{Pn, Tdn, Tkn, Tn};

    fn nitrogen_resolver() -> Resolver {
        Resolver::with_single_fallbacks(
            IndicatorKind::NitrogenLevel,
            vec![Tn.into(), Tdn.into(), Tkn.into(), Pn.into()],
            vec![
                Strategy::direct("TN", Tn, 1.0),
                Strategy::derived_sum("TDN_PN", [Tdn.into(), Pn.into()], Tn, 1.0),
            ],
            1.0,
        )
    }

    fn resolve(m: &Measurements) -> Result<Resolution, IndicatorError> {
        let upstream = BTreeMap::new();
        nitrogen_resolver().resolve(&Evidence::new(m, &upstream))
    }

    #[test]
    fn test_fallbacks_follow_priority_without_duplicates() {
        let methods: Vec<_> = nitrogen_resolver()
            .strategies()
            .iter()
            .map(|s| s.method)
            .collect();
        assert_eq!(methods, vec!["TN", "TDN_PN", "TDN", "TKN", "PN"]);
    }

    #[test]
    fn test_preferred_variable_beats_derived_sum() {
        let m = Measurements::new().with(Tn, 2.0).with(Tdn, 1.0).with(Pn, 0.5);
        let r = resolve(&m).expect("resolved");
        assert_eq!(r.method, "TN");
        assert_eq!(r.crisp, vec![("TN", 2.0)]);
        assert_eq!(r.used, vec![InputKey::from(Tn)]);
    }

    #[test]
    fn test_derived_sum_feeds_proxy() {
        let m = Measurements::new().with(Tdn, 1.0).with(Pn, 0.5);
        let r = resolve(&m).expect("resolved");
        assert_eq!(r.method, "TDN_PN");
        assert_eq!(r.crisp, vec![("TN", 1.5)]);
        assert_eq!(r.used, vec![InputKey::from(Tdn), InputKey::from(Pn)]);
    }

    #[test]
    fn test_single_fallback() {
        let m = Measurements::new().with(Pn, 0.5).with(Tkn, 3.0);
        let r = resolve(&m).expect("resolved");
        assert_eq!(r.method, "TKN");
        assert_eq!(r.index, 3);
    }

    #[test]
    fn test_nothing_available_is_insufficient_input() {
        let m = Measurements::new().with(Tn, f64::NAN);
        assert!(matches!(
            resolve(&m),
            Err(IndicatorError::InsufficientInput { indicator: IndicatorKind::NitrogenLevel, .. })
        ));
    }

    #[test]
    fn test_upstream_only_resolver_reports_missing_upstream() {
        let resolver = Resolver::new(
            IndicatorKind::NutrientLevel,
            vec![
                IndicatorKind::NitrogenLevel.into(),
                IndicatorKind::PhosphorusLevel.into(),
            ],
            vec![Strategy::joint(
                "NITROGEN_PHOSPHORUS",
                vec![
                    IndicatorKind::NitrogenLevel.into(),
                    IndicatorKind::PhosphorusLevel.into(),
                ],
                1.0,
            )],
        );
        let m = Measurements::new();
        let upstream = BTreeMap::from([(IndicatorKind::NitrogenLevel, 0.12)]);
        let err = resolver
            .resolve(&Evidence::new(&m, &upstream))
            .expect_err("phosphorus is missing");
        assert_eq!(
            err,
            IndicatorError::UpstreamUndefined {
                indicator: IndicatorKind::NutrientLevel,
                missing: vec![IndicatorKind::PhosphorusLevel.into()],
            }
        );
    }
}
