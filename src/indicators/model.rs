//! Resolver + inference units bound together for one indicator.

use crate::error::IndicatorError;
use crate::fuzzy::{FuzzyError, FuzzyVariable, InferenceError, InferenceUnit, Rule};
use crate::resolver::{Evidence, Resolver, Strategy};
use crate::types::{IndicatorKind, IndicatorResult, Term};
use tracing::debug;

/// One indicator: strategy selection plus one inference unit per strategy.
#[derive(Debug, Clone)]
pub struct IndicatorModel {
    kind: IndicatorKind,
    resolver: Resolver,
    output: FuzzyVariable,
    /// Parallel to `resolver.strategies()`.
    units: Vec<InferenceUnit>,
}

impl IndicatorModel {
    /// Build an inference unit for every strategy of `resolver`.
    ///
    /// `variables` holds the input variables by name; a derived sum is
    /// fuzzified through its proxy variable. `rules` supplies the rule base
    /// for each strategy.
    pub fn new(
        kind: IndicatorKind,
        resolver: Resolver,
        variables: &[FuzzyVariable],
        output: FuzzyVariable,
        clamp_inputs: bool,
        rules: impl Fn(&Strategy) -> Vec<Rule>,
    ) -> Self {
        let units = resolver
            .strategies()
            .iter()
            .map(|strategy| {
                let inputs = strategy
                    .source
                    .variables()
                    .iter()
                    .filter_map(|key| variables.iter().find(|v| v.name == key.name()))
                    .cloned()
                    .collect();
                InferenceUnit::new(inputs, output.clone(), rules(strategy))
                    .with_clamping(clamp_inputs)
            })
            .collect();

        Self {
            kind,
            resolver,
            output,
            units,
        }
    }

    pub const fn kind(&self) -> IndicatorKind {
        self.kind
    }

    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub const fn output(&self) -> &FuzzyVariable {
        &self.output
    }

    /// Inference unit behind the strategy tagged `method`.
    pub fn unit(&self, method: &str) -> Option<&InferenceUnit> {
        self.resolver
            .strategies()
            .iter()
            .position(|s| s.method == method)
            .and_then(|i| self.units.get(i))
    }

    /// Check every unit: variables present, rule atoms declared.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        for (strategy, unit) in self.resolver.strategies().iter().zip(&self.units) {
            let expected = strategy.source.variables().len();
            if unit.inputs().len() != expected {
                let missing = strategy
                    .source
                    .variables()
                    .into_iter()
                    .find(|k| unit.inputs().iter().all(|v| v.name != k.name()))
                    .map_or(strategy.method, |k| k.name());
                return Err(FuzzyError::UnknownVariable(missing));
            }
            unit.validate()?;
        }
        Ok(())
    }

    /// Resolve inputs, run the selected unit and package the result.
    pub fn evaluate(&self, evidence: &Evidence<'_>) -> Result<IndicatorResult, IndicatorError> {
        let resolution = self.resolver.resolve(evidence)?;
        let unit = self
            .units
            .get(resolution.index)
            .ok_or_else(|| IndicatorError::Inference {
                indicator: self.kind,
                source: InferenceError::MissingUnit(resolution.method),
            })?;
        let inference = unit
            .infer(&resolution.crisp)
            .map_err(|source| IndicatorError::Inference {
                indicator: self.kind,
                source,
            })?;

        debug!(
            indicator = %self.kind,
            method = resolution.method,
            value = inference.value,
            label = %inference.label,
            confidence = resolution.confidence,
            "Indicator resolved"
        );

        Ok(IndicatorResult {
            used_variables: resolution.used,
            calculation_method: Some(resolution.method),
            value: Some(inference.value),
            label: Some(inference.label),
            confidence: resolution.confidence,
        })
    }

    /// Output term with the highest degree at `value`, clipped to the output
    /// universe first so forecasts past either end take the edge term.
    pub fn label(&self, value: f64) -> Option<Term> {
        self.output.best_term(self.output.universe.clamp(value))
    }
}
