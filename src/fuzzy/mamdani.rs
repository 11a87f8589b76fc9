//! Mamdani inference unit
//!
//! ## Pipeline
//!
//! 1. **Fuzzify**: each crisp input (clipped to its universe) becomes one
//!    degree per term.
//! 2. **Evaluate rules**: antecedent degree via min/max; the consequent term
//!    is clipped at that degree.
//! 3. **Aggregate**: pointwise max of the clipped consequents, sampled over
//!    the output universe.
//! 4. **Defuzzify**: discrete centroid `Σ x·μ(x) / Σ μ(x)`.
//! 5. **Label**: output term with the highest degree at the centroid.

use super::{Degrees, FuzzyError, FuzzyVariable, Rule};
use crate::types::Term;
use thiserror::Error;

/// Aggregated area below this is treated as empty.
const MIN_AREA: f64 = 1e-10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("no rule fired for '{output}': aggregated output is empty")]
    EmptyAggregate { output: &'static str },
    #[error("missing crisp input for variable '{0}'")]
    MissingInput(&'static str),
    #[error("no inference unit built for strategy '{0}'")]
    MissingUnit(&'static str),
    #[error("crisp value {value} for '{output}' is not covered by any output term")]
    Unlabeled { output: &'static str, value: f64 },
    #[error(transparent)]
    Fuzzy(#[from] FuzzyError),
}

/// Crisp output of one inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub value: f64,
    pub label: Term,
}

/// Rule base bound to its input and output variables.
#[derive(Debug, Clone)]
pub struct InferenceUnit {
    inputs: Vec<FuzzyVariable>,
    output: FuzzyVariable,
    rules: Vec<Rule>,
    clamp_inputs: bool,
}

impl InferenceUnit {
    pub fn new(inputs: Vec<FuzzyVariable>, output: FuzzyVariable, rules: Vec<Rule>) -> Self {
        Self {
            inputs,
            output,
            rules,
            clamp_inputs: true,
        }
    }

    /// Whether crisp inputs are clipped to their universe before fuzzifying.
    #[must_use]
    pub const fn with_clamping(mut self, clamp_inputs: bool) -> Self {
        self.clamp_inputs = clamp_inputs;
        self
    }

    pub fn inputs(&self) -> &[FuzzyVariable] {
        &self.inputs
    }

    pub const fn output(&self) -> &FuzzyVariable {
        &self.output
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Check variables and that every rule atom names a declared term.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        self.output.validate()?;
        for input in &self.inputs {
            input.validate()?;
        }
        for rule in &self.rules {
            if !self.output.has_term(rule.consequent) {
                return Err(FuzzyError::UnknownTerm {
                    variable: self.output.name,
                    term: rule.consequent,
                });
            }
            for (variable, term) in rule.antecedent.atoms() {
                let declared = self
                    .inputs
                    .iter()
                    .find(|v| v.name == variable)
                    .ok_or(FuzzyError::UnknownVariable(variable))?;
                if !declared.has_term(term) {
                    return Err(FuzzyError::UnknownTerm { variable, term });
                }
            }
        }
        Ok(())
    }

    /// Degrees of every input term. `crisp` is matched to inputs by name.
    pub fn fuzzify(&self, crisp: &[(&'static str, f64)]) -> Result<Degrees, InferenceError> {
        let mut degrees = Degrees::default();
        for variable in &self.inputs {
            let x = crisp
                .iter()
                .find(|(name, _)| *name == variable.name)
                .map(|(_, x)| *x)
                .ok_or(InferenceError::MissingInput(variable.name))?;
            let x = if self.clamp_inputs {
                variable.universe.clamp(x)
            } else {
                x
            };
            for (term, degree) in variable.fuzzify(x) {
                degrees.insert(variable.name, term, degree);
            }
        }
        Ok(degrees)
    }

    /// Firing strength of each rule, in rule order.
    pub fn evaluate_rules(&self, degrees: &Degrees) -> Result<Vec<(Term, f64)>, InferenceError> {
        self.rules
            .iter()
            .map(|rule| Ok((rule.consequent, rule.antecedent.degree(degrees)?)))
            .collect()
    }

    /// Aggregated output membership sampled over the output universe.
    pub fn aggregate(&self, activations: &[(Term, f64)]) -> Result<Vec<(f64, f64)>, InferenceError> {
        let mut clipped = Vec::with_capacity(activations.len());
        for (term, strength) in activations {
            if *strength <= 0.0 {
                continue;
            }
            let mf = self
                .output
                .membership(*term)
                .ok_or(FuzzyError::UnknownTerm {
                    variable: self.output.name,
                    term: *term,
                })?;
            clipped.push((mf, *strength));
        }

        Ok(self
            .output
            .universe
            .points()
            .map(|x| {
                let mu = clipped
                    .iter()
                    .map(|(mf, strength)| mf.degree(x).min(*strength))
                    .fold(0.0_f64, f64::max);
                (x, mu)
            })
            .collect())
    }

    /// Discrete centroid of the aggregated shape.
    pub fn defuzzify(&self, aggregated: &[(f64, f64)]) -> Result<f64, InferenceError> {
        let (moment, area) = aggregated
            .iter()
            .fold((0.0_f64, 0.0_f64), |(m, a), (x, mu)| (x.mul_add(*mu, m), a + mu));
        if area < MIN_AREA {
            return Err(InferenceError::EmptyAggregate {
                output: self.output.name,
            });
        }
        Ok(moment / area)
    }

    /// Output term with the highest degree at `value`.
    pub fn label(&self, value: f64) -> Result<Term, InferenceError> {
        self.output
            .best_term(value)
            .ok_or(InferenceError::Unlabeled {
                output: self.output.name,
                value,
            })
    }

    /// Run the whole pipeline for one set of crisp inputs.
    pub fn infer(&self, crisp: &[(&'static str, f64)]) -> Result<Inference, InferenceError> {
        let degrees = self.fuzzify(crisp)?;
        let activations = self.evaluate_rules(&degrees)?;
        let aggregated = self.aggregate(&activations)?;
        let value = self.defuzzify(&aggregated)?;
        let label = self.label(value)?;
        Ok(Inference { value, label })
    }
}
