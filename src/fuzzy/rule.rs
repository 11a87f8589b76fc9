//! Rule antecedents and implications.
//!
//! Antecedents are small expression trees over `(variable, term)` pairs.
//! Rule tables are written with the helpers in this module:
//!
//! ```ignore
//! let rule = Rule::new(is("TEMP", Term::Low).and(is("pH", Term::Neutral)), Term::Neutral);
//! ```

use super::FuzzyError;
use crate::types::Term;
use std::collections::HashMap;

/// Boolean expression over fuzzified inputs. AND is min, OR is max.
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    Is { variable: &'static str, term: Term },
    And(Vec<Antecedent>),
    Or(Vec<Antecedent>),
}

/// `variable IS term`.
pub const fn is(variable: &'static str, term: Term) -> Antecedent {
    Antecedent::Is { variable, term }
}

/// `variable IS t1 OR variable IS t2 ...`
pub fn is_any(variable: &'static str, terms: &[Term]) -> Antecedent {
    Antecedent::Or(terms.iter().map(|t| is(variable, *t)).collect())
}

impl Antecedent {
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut operands) => {
                operands.push(other);
                Self::And(operands)
            }
            first => Self::And(vec![first, other]),
        }
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut operands) => {
                operands.push(other);
                Self::Or(operands)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    /// Truth degree given the fuzzified inputs.
    pub fn degree(&self, degrees: &Degrees) -> Result<f64, FuzzyError> {
        match self {
            Self::Is { variable, term } => degrees.get(variable, *term),
            Self::And(operands) => operands
                .iter()
                .try_fold(1.0_f64, |acc, op| Ok(acc.min(op.degree(degrees)?))),
            Self::Or(operands) => operands
                .iter()
                .try_fold(0.0_f64, |acc, op| Ok(acc.max(op.degree(degrees)?))),
        }
    }

    /// Every `(variable, term)` pair referenced, depth first.
    pub fn atoms(&self) -> Vec<(&'static str, Term)> {
        match self {
            Self::Is { variable, term } => vec![(*variable, *term)],
            Self::And(operands) | Self::Or(operands) => {
                operands.iter().flat_map(Self::atoms).collect()
            }
        }
    }
}

/// One implication `antecedent => output IS consequent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Antecedent,
    pub consequent: Term,
}

impl Rule {
    pub const fn new(antecedent: Antecedent, consequent: Term) -> Self {
        Self {
            antecedent,
            consequent,
        }
    }
}

/// Single-input rules mapping each input term straight to an output term.
pub fn pass_through(variable: &'static str, mapping: &[(Term, Term)]) -> Vec<Rule> {
    mapping
        .iter()
        .map(|(input, output)| Rule::new(is(variable, *input), *output))
        .collect()
}

/// Membership degrees of every input term for one sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Degrees {
    values: HashMap<(&'static str, Term), f64>,
}

impl Degrees {
    pub fn insert(&mut self, variable: &'static str, term: Term, degree: f64) {
        self.values.insert((variable, term), degree);
    }

    pub fn get(&self, variable: &'static str, term: Term) -> Result<f64, FuzzyError> {
        self.values
            .get(&(variable, term))
            .copied()
            .ok_or(FuzzyError::UnknownTerm { variable, term })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees() -> Degrees {
        let mut d = Degrees::default();
        d.insert("TEMP", Term::Moderate, 0.5);
        d.insert("TEMP", Term::High, 0.0);
        d.insert("pH", Term::Neutral, 0.8);
        d.insert("pH", Term::Acid, 0.1);
        d
    }

    #[test]
    fn test_and_is_min_or_is_max() {
        let d = degrees();
        let rule = is_any("TEMP", &[Term::Moderate, Term::High]).and(is("pH", Term::Neutral));
        assert_eq!(rule.degree(&d).expect("known atoms"), 0.5);

        let either = is("pH", Term::Acid).or(is("TEMP", Term::Moderate));
        assert_eq!(either.degree(&d).expect("known atoms"), 0.5);
    }

    #[test]
    fn test_chaining_flattens() {
        let a = is("x", Term::Low).and(is("y", Term::Low)).and(is("z", Term::Low));
        assert!(matches!(&a, Antecedent::And(ops) if ops.len() == 3));
        assert_eq!(a.atoms().len(), 3);
    }

    #[test]
    fn test_unknown_atom_is_an_error() {
        let d = degrees();
        assert!(is("TURB", Term::Low).degree(&d).is_err());
    }

    #[test]
    fn test_pass_through() {
        let rules = pass_through("TN", &[(Term::Low, Term::Low), (Term::High, Term::VeryHigh)]);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].consequent, Term::VeryHigh);
        assert_eq!(rules[1].antecedent, is("TN", Term::High));
    }
}
