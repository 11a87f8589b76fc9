//! Fuzzy variables: a discretized universe plus ordered linguistic terms.

use super::{FuzzyError, MembershipFunction};
use crate::types::Term;
use serde::Serialize;

/// Closed numeric range sampled at a fixed resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// `[0, 1]` at 0.01, shared by every indicator output.
    pub const fn unit() -> Self {
        Self::new(0.0, 1.0, 0.01)
    }

    /// Number of sample points, both ends included.
    pub fn sample_count(&self) -> usize {
        // Validated universes have max >= min and step > 0.
        ((self.max - self.min) / self.step).round() as usize + 1
    }

    /// Sample points `min + i * step`.
    ///
    /// Generated by index, not by accumulation, so the grid is identical on
    /// every call.
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count()).map(move |i| (i as f64).mul_add(self.step, self.min))
    }

    /// Clip a crisp value into the universe range.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    pub fn validate(&self) -> Result<(), FuzzyError> {
        let valid = self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && self.max >= self.min;
        if valid {
            Ok(())
        } else {
            Err(FuzzyError::InvalidUniverse {
                min: self.min,
                max: self.max,
                step: self.step,
            })
        }
    }
}

/// A named variable with its universe and ordered terms.
///
/// Term order is declaration order and decides labeling ties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyVariable {
    pub name: &'static str,
    pub universe: Universe,
    pub terms: Vec<(Term, MembershipFunction)>,
}

impl FuzzyVariable {
    pub fn new(
        name: &'static str,
        universe: Universe,
        terms: impl IntoIterator<Item = (Term, MembershipFunction)>,
    ) -> Self {
        Self {
            name,
            universe,
            terms: terms.into_iter().collect(),
        }
    }

    /// Standard four-level variable: LOW and VERY HIGH shoulders around two
    /// triangles.
    pub fn four_level(
        name: &'static str,
        universe: Universe,
        low: [f64; 4],
        moderate: [f64; 3],
        high: [f64; 3],
        very_high: [f64; 4],
    ) -> Self {
        Self::new(
            name,
            universe,
            [
                (Term::Low, MembershipFunction::Trapezoid(low)),
                (Term::Moderate, MembershipFunction::Triangle(moderate)),
                (Term::High, MembershipFunction::Triangle(high)),
                (Term::VeryHigh, MembershipFunction::Trapezoid(very_high)),
            ],
        )
    }

    /// Same term shapes under another name, used when a derived sum is
    /// fuzzified through the variable it stands in for.
    #[must_use]
    pub fn renamed(&self, name: &'static str) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    pub fn membership(&self, term: Term) -> Option<&MembershipFunction> {
        self.terms.iter().find(|(t, _)| *t == term).map(|(_, mf)| mf)
    }

    pub fn has_term(&self, term: Term) -> bool {
        self.membership(term).is_some()
    }

    pub fn degree(&self, term: Term, x: f64) -> Result<f64, FuzzyError> {
        self.membership(term)
            .map(|mf| mf.degree(x))
            .ok_or(FuzzyError::UnknownTerm {
                variable: self.name,
                term,
            })
    }

    /// Degree of every term at `x`, in declaration order.
    pub fn fuzzify(&self, x: f64) -> Vec<(Term, f64)> {
        self.terms.iter().map(|(t, mf)| (*t, mf.degree(x))).collect()
    }

    /// Term with the highest degree at `x`; the first declared wins ties.
    /// `None` when no term covers `x`.
    pub fn best_term(&self, x: f64) -> Option<Term> {
        let mut best: Option<(Term, f64)> = None;
        for (term, degree) in self.fuzzify(x) {
            match best {
                Some((_, d)) if degree <= d => {}
                _ => best = Some((term, degree)),
            }
        }
        best.filter(|(_, d)| *d > 0.0).map(|(t, _)| t)
    }

    pub fn validate(&self) -> Result<(), FuzzyError> {
        self.universe.validate()?;
        if self.terms.is_empty() {
            return Err(FuzzyError::NoTerms(self.name));
        }
        for (_, mf) in &self.terms {
            mf.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> FuzzyVariable {
        FuzzyVariable::four_level(
            "level",
            Universe::unit(),
            [0.0, 0.0, 0.2, 0.4],
            [0.3, 0.5, 0.7],
            [0.6, 0.75, 0.9],
            [0.85, 0.95, 1.0, 1.0],
        )
    }

    #[test]
    fn test_unit_universe_has_101_points() {
        let u = Universe::unit();
        assert_eq!(u.sample_count(), 101);
        let points: Vec<f64> = u.points().collect();
        assert_eq!(points[0], 0.0);
        assert!((points[100] - 1.0).abs() < 1e-12);
        assert!((points[37] - 0.37).abs() < 1e-12);
    }

    #[test]
    fn test_clamp() {
        let u = Universe::new(5.0, 10.0, 0.1);
        assert_eq!(u.clamp(3.2), 5.0);
        assert_eq!(u.clamp(12.0), 10.0);
        assert_eq!(u.clamp(7.0), 7.0);
    }

    #[test]
    fn test_best_term_takes_maximum() {
        let v = levels();
        assert_eq!(v.best_term(0.1), Some(Term::Low));
        assert_eq!(v.best_term(0.5), Some(Term::Moderate));
        assert_eq!(v.best_term(0.97), Some(Term::VeryHigh));
    }

    #[test]
    fn test_best_term_tie_goes_to_first_declared() {
        let low = (Term::Low, MembershipFunction::Trapezoid([0.0, 0.0, 0.25, 0.5]));
        let moderate = (Term::Moderate, MembershipFunction::Triangle([0.25, 0.5, 0.75]));

        // Both terms sit at exactly 0.5 at x = 0.375.
        let v = FuzzyVariable::new("tie", Universe::unit(), [low, moderate]);
        assert_eq!(v.fuzzify(0.375), vec![(Term::Low, 0.5), (Term::Moderate, 0.5)]);
        assert_eq!(v.best_term(0.375), Some(Term::Low));

        let reversed = FuzzyVariable::new("tie", Universe::unit(), [moderate, low]);
        assert_eq!(reversed.best_term(0.375), Some(Term::Moderate));
    }

    #[test]
    fn test_best_term_none_outside_support() {
        let v = FuzzyVariable::new(
            "narrow",
            Universe::unit(),
            [(Term::Good, MembershipFunction::Triangle([0.4, 0.5, 0.6]))],
        );
        assert_eq!(v.best_term(0.9), None);
    }

    #[test]
    fn test_unknown_term_is_an_error() {
        let v = levels();
        assert!(matches!(
            v.degree(Term::Acid, 0.5),
            Err(FuzzyError::UnknownTerm { term: Term::Acid, .. })
        ));
    }

    #[test]
    fn test_validate() {
        assert!(levels().validate().is_ok());
        let bad = FuzzyVariable::new(
            "bad",
            Universe::new(1.0, 0.0, 0.1),
            Vec::<(Term, MembershipFunction)>::new(),
        );
        assert!(matches!(bad.validate(), Err(FuzzyError::InvalidUniverse { .. })));
    }
}
