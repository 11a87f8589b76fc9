//! Linguistic terms shared by every fuzzy variable in the cascade.

use serde::{Deserialize, Serialize};

/// A linguistic term of a fuzzy variable.
///
/// Input variables and indicator outputs draw from the same closed vocabulary,
/// so labels can be compared across indicators (for example a Carlson TSI
/// level against the eutrophication label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    #[serde(rename = "VERY LOW")]
    VeryLow,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
    #[serde(rename = "GOOD")]
    Good,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "BAD")]
    Bad,
    #[serde(rename = "VERY BAD")]
    VeryBad,
    #[serde(rename = "ACID")]
    Acid,
    #[serde(rename = "ALKALINE")]
    Alkaline,
    #[serde(rename = "UNFAVORABLE")]
    Unfavorable,
    #[serde(rename = "FAVORABLE")]
    Favorable,
    #[serde(rename = "OLIGOTROPHIC")]
    Oligotrophic,
    #[serde(rename = "MESOTROPHIC")]
    Mesotrophic,
    #[serde(rename = "EUTROPHIC")]
    Eutrophic,
    #[serde(rename = "HYPEREUTROPHIC")]
    Hypereutrophic,
}

/// Label reported for an indicator that produced no value.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

impl Term {
    pub const ALL: [Self; 17] = [
        Self::VeryLow,
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::VeryHigh,
        Self::Good,
        Self::Neutral,
        Self::Bad,
        Self::VeryBad,
        Self::Acid,
        Self::Alkaline,
        Self::Unfavorable,
        Self::Favorable,
        Self::Oligotrophic,
        Self::Mesotrophic,
        Self::Eutrophic,
        Self::Hypereutrophic,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "VERY LOW",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY HIGH",
            Self::Good => "GOOD",
            Self::Neutral => "NEUTRAL",
            Self::Bad => "BAD",
            Self::VeryBad => "VERY BAD",
            Self::Acid => "ACID",
            Self::Alkaline => "ALKALINE",
            Self::Unfavorable => "UNFAVORABLE",
            Self::Favorable => "FAVORABLE",
            Self::Oligotrophic => "OLIGOTROPHIC",
            Self::Mesotrophic => "MESOTROPHIC",
            Self::Eutrophic => "EUTROPHIC",
            Self::Hypereutrophic => "HYPEREUTROPHIC",
        }
    }

    /// Parse a label as printed by [`Term::as_str`] (case-insensitive,
    /// underscores accepted in place of spaces).
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().replace('_', " ").to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_accepts_display_form() {
        for term in Term::ALL {
            assert_eq!(Term::from_label(term.as_str()), Some(term));
        }
    }

    #[test]
    fn test_from_label_is_lenient_on_case_and_underscores() {
        assert_eq!(Term::from_label("very_high"), Some(Term::VeryHigh));
        assert_eq!(Term::from_label(" hypereutrophic "), Some(Term::Hypereutrophic));
        assert_eq!(Term::from_label("UNKNOWN"), None);
    }

    #[test]
    fn test_serde_uses_display_form() {
        let json = serde_json::to_string(&Term::VeryBad).expect("serialize");
        assert_eq!(json, "\"VERY BAD\"");
        let back: Term = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Term::VeryBad);
    }
}
