//! Piecewise-linear membership functions.

use super::FuzzyError;
use serde::{Deserialize, Serialize};

/// Degree of truth of a crisp value for one linguistic term.
///
/// Breakpoints must be non-decreasing. Equal adjacent breakpoints form a
/// vertical edge, so `Trapezoid([0, 0, 2, 5])` is a left shoulder with
/// degree 1 at `x = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "points", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Rises over `[a, b]`, flat at 1 over `[b, c]`, falls over `[c, d]`.
    Trapezoid([f64; 4]),
    /// Rises over `[a, b]`, peaks at `b`, falls over `[b, c]`.
    Triangle([f64; 3]),
}

impl MembershipFunction {
    /// Checked trapezoid constructor.
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Result<Self, FuzzyError> {
        let mf = Self::Trapezoid([a, b, c, d]);
        mf.validate()?;
        Ok(mf)
    }

    /// Checked triangle constructor.
    pub fn triangle(a: f64, b: f64, c: f64) -> Result<Self, FuzzyError> {
        let mf = Self::Triangle([a, b, c]);
        mf.validate()?;
        Ok(mf)
    }

    pub fn breakpoints(&self) -> &[f64] {
        match self {
            Self::Trapezoid(p) => p,
            Self::Triangle(p) => p,
        }
    }

    pub fn validate(&self) -> Result<(), FuzzyError> {
        let points = self.breakpoints();
        let ordered = points.iter().all(|p| p.is_finite())
            && points.windows(2).all(|w| w[0] <= w[1]);
        if ordered {
            Ok(())
        } else {
            Err(FuzzyError::InvalidBreakpoints(points.to_vec()))
        }
    }

    /// Membership degree in [0, 1].
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Trapezoid([a, b, c, d]) => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            Self::Triangle([a, b, c]) => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
        }
    }
}
