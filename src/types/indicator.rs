//! Indicator identities, cascade phases and per-indicator results.

use super::{MeasurementCode, Term, UNKNOWN_LABEL};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

// ============================================================================
// Phases
// ============================================================================

/// One of the four ordered cascade stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Raw measurements to primary indicators.
    Primary = 1,
    /// Nutrient level.
    Nutrients = 2,
    /// Physical and chemical conditions.
    Conditions = 3,
    /// Eutrophication level.
    Trophic = 4,
}

impl Phase {
    pub const ALL: [Self; 4] = [Self::Primary, Self::Nutrients, Self::Conditions, Self::Trophic];

    pub const fn number(self) -> u8 {
        self as u8
    }
}

// ============================================================================
// Indicators
// ============================================================================

/// The sub-assessments of the cascade plus the final eutrophication level.
///
/// Declaration order is cascade order, which is also the iteration order of
/// every map keyed by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    NitrogenLevel,
    PhosphorusLevel,
    OxygenBalance,
    SolidsLevel,
    VisibilityLevel,
    AdditionalConditions,
    NutrientLevel,
    PhysicalConditions,
    ChemicalConditions,
    EutrophicationLevel,
}

impl IndicatorKind {
    pub const ALL: [Self; 10] = [
        Self::NitrogenLevel,
        Self::PhosphorusLevel,
        Self::OxygenBalance,
        Self::SolidsLevel,
        Self::VisibilityLevel,
        Self::AdditionalConditions,
        Self::NutrientLevel,
        Self::PhysicalConditions,
        Self::ChemicalConditions,
        Self::EutrophicationLevel,
    ];

    /// Stable snake_case key used in chains and as the fuzzy variable name
    /// when the indicator feeds a later phase.
    pub const fn key(self) -> &'static str {
        match self {
            Self::NitrogenLevel => "nitrogen_level",
            Self::PhosphorusLevel => "phosphorus_level",
            Self::OxygenBalance => "oxygen_balance",
            Self::SolidsLevel => "solids_level",
            Self::VisibilityLevel => "visibility_level",
            Self::AdditionalConditions => "additional_conditions",
            Self::NutrientLevel => "nutrient_level",
            Self::PhysicalConditions => "physical_conditions",
            Self::ChemicalConditions => "chemical_conditions",
            Self::EutrophicationLevel => "eutrophication_level",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    pub const fn phase(self) -> Phase {
        match self {
            Self::NitrogenLevel
            | Self::PhosphorusLevel
            | Self::OxygenBalance
            | Self::SolidsLevel
            | Self::VisibilityLevel
            | Self::AdditionalConditions => Phase::Primary,
            Self::NutrientLevel => Phase::Nutrients,
            Self::PhysicalConditions | Self::ChemicalConditions => Phase::Conditions,
            Self::EutrophicationLevel => Phase::Trophic,
        }
    }

    /// Indicators computed in the given phase, in cascade order.
    pub fn in_phase(phase: Phase) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |k| k.phase() == phase)
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Evidence keys
// ============================================================================

/// Anything an indicator can consume: a raw measurement or the crisp value
/// of an indicator computed in an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputKey {
    Measurement(MeasurementCode),
    Indicator(IndicatorKind),
}

impl InputKey {
    /// Name of the fuzzy variable fed by this key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Measurement(code) => code.code(),
            Self::Indicator(kind) => kind.key(),
        }
    }
}

impl From<MeasurementCode> for InputKey {
    fn from(code: MeasurementCode) -> Self {
        Self::Measurement(code)
    }
}

impl From<IndicatorKind> for InputKey {
    fn from(kind: IndicatorKind) -> Self {
        Self::Indicator(kind)
    }
}

impl std::fmt::Display for InputKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for InputKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of one indicator for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorResult {
    /// Inputs actually consumed by the selected strategy, in strategy order.
    pub used_variables: Vec<InputKey>,
    /// Tag of the strategy that fired (`None` when undefined).
    pub calculation_method: Option<&'static str>,
    /// Defuzzified value in [0, 1].
    pub value: Option<f64>,
    pub label: Option<Term>,
    pub confidence: f64,
}

impl IndicatorResult {
    /// Result of an indicator that was skipped or failed.
    pub const fn undefined() -> Self {
        Self {
            used_variables: Vec::new(),
            calculation_method: None,
            value: None,
            label: None,
            confidence: 0.0,
        }
    }

    pub const fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    /// Label for display, `"UNKNOWN"` when undefined.
    pub fn label_str(&self) -> &'static str {
        self.label.map_or(UNKNOWN_LABEL, Term::as_str)
    }
}

impl Default for IndicatorResult {
    fn default() -> Self {
        Self::undefined()
    }
}

impl Serialize for IndicatorResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("IndicatorResult", 5)?;
        s.serialize_field("used_variables", &self.used_variables)?;
        s.serialize_field("calculation_method", &self.calculation_method.unwrap_or("-"))?;
        s.serialize_field("value", &self.value)?;
        s.serialize_field("label", self.label_str())?;
        s.serialize_field("confidence", &self.confidence)?;
        s.end()
    }
}

/// Failure category recorded in a chain's error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InsufficientInput,
    InferenceFailure,
    UpstreamUndefined,
    /// The indicator's phase lies beyond the requested depth.
    Skipped,
}

/// Why an indicator has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl std::fmt::Display for IndicatorFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_membership() {
        let primary: Vec<_> = IndicatorKind::in_phase(Phase::Primary).collect();
        assert_eq!(primary.len(), 6);
        assert_eq!(
            IndicatorKind::in_phase(Phase::Conditions).collect::<Vec<_>>(),
            vec![IndicatorKind::PhysicalConditions, IndicatorKind::ChemicalConditions]
        );
        assert_eq!(IndicatorKind::EutrophicationLevel.phase().number(), 4);
    }

    #[test]
    fn test_cascade_order_never_goes_back_a_phase() {
        for pair in IndicatorKind::ALL.windows(2) {
            assert!(pair[0].phase() <= pair[1].phase());
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(
            IndicatorKind::from_key("eutrophication-level"),
            Some(IndicatorKind::EutrophicationLevel)
        );
        assert_eq!(IndicatorKind::from_key("Nutrient Level"), Some(IndicatorKind::NutrientLevel));
        assert_eq!(IndicatorKind::from_key("salinity"), None);
    }

    #[test]
    fn test_undefined_result_serializes_as_unknown() {
        let json = serde_json::to_value(IndicatorResult::undefined()).expect("serialize");
        assert_eq!(json["label"], "UNKNOWN");
        assert_eq!(json["calculation_method"], "-");
        assert!(json["value"].is_null());
        assert_eq!(json["confidence"], 0.0);
    }

    #[test]
    fn test_input_key_names() {
        assert_eq!(InputKey::from(MeasurementCode::O2Dis).name(), "O2_Dis");
        assert_eq!(InputKey::from(IndicatorKind::SolidsLevel).name(), "solids_level");
    }
}
