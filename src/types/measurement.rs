//! Measurement vocabulary and the per-sample measurement bag.
//!
//! The engine accepts a closed set of physico-chemical parameter codes.
//! Values arrive as a loosely typed mapping (JSON object, CSV row) and are
//! validated here, at the boundary: unknown codes are dropped, `null` and
//! non-finite numbers become the absent sentinel (NaN).

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Measurement codes
// ============================================================================

/// A recognized physico-chemical parameter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeasurementCode {
    ChlA,
    // Nitrogen fractions
    Din,
    Dkn,
    Nh3n,
    Nh4n,
    NoxN,
    No2n,
    No3n,
    Pn,
    Pon,
    Tdn,
    Tkn,
    Tn,
    Ton,
    Don,
    // Phosphorus fractions
    Dip,
    Drp,
    Tdp,
    Tip,
    Tp,
    Trp,
    Tpp,
    // Oxygen
    Bod,
    Cod,
    O2Dis,
    Pv,
    // Solids
    Tds,
    Ts,
    Tss,
    Fds,
    Fs,
    Vds,
    Vs,
    // Optics
    Trans,
    Turb,
    // Ambient
    Temp,
    Ph,
}

/// Static metadata for a measurement code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeasurementInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

impl MeasurementCode {
    pub const ALL: [Self; 37] = [
        Self::ChlA,
        Self::Din,
        Self::Dkn,
        Self::Nh3n,
        Self::Nh4n,
        Self::NoxN,
        Self::No2n,
        Self::No3n,
        Self::Pn,
        Self::Pon,
        Self::Tdn,
        Self::Tkn,
        Self::Tn,
        Self::Ton,
        Self::Don,
        Self::Dip,
        Self::Drp,
        Self::Tdp,
        Self::Tip,
        Self::Tp,
        Self::Trp,
        Self::Tpp,
        Self::Bod,
        Self::Cod,
        Self::O2Dis,
        Self::Pv,
        Self::Tds,
        Self::Ts,
        Self::Tss,
        Self::Fds,
        Self::Fs,
        Self::Vds,
        Self::Vs,
        Self::Trans,
        Self::Turb,
        Self::Temp,
        Self::Ph,
    ];

    /// Wire code as it appears in input tables ("TN", "O2_Dis", "pH", ...).
    pub const fn code(self) -> &'static str {
        self.info().code
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub const fn info(self) -> MeasurementInfo {
        const MG_L: &str = "mg/l";
        let (code, name, unit, description) = match self {
            Self::ChlA => ("Chl_a", "Chlorophyll a", MG_L, "Concentration of chlorophyll a, a proxy for phytoplankton biomass."),
            Self::Din => ("DIN", "Inorganic Nitrogen", MG_L, "Sum of nitrite, nitrate and total ammonia nitrogen in filtered samples."),
            Self::Dkn => ("DKN", "Kjeldahl Nitrogen", MG_L, "Organic nitrogen and total ammonia nitrogen in filtered samples, as nitrogen."),
            Self::Nh3n => ("NH3N", "Ammonia", MG_L, "Un-ionized ammonia, as nitrogen."),
            Self::Nh4n => ("NH4N", "Ammonia", MG_L, "Combined un-ionized and ionized ammonia, as nitrogen."),
            Self::NoxN => ("NOxN", "Oxidized Nitrogen", MG_L, "Nitrate and nitrite nitrogen in unfiltered samples, as nitrogen."),
            Self::No2n => ("NO2N", "Oxidized Nitrogen", MG_L, "Nitrite, as nitrogen."),
            Self::No3n => ("NO3N", "Oxidized Nitrogen", MG_L, "Nitrate, as nitrogen."),
            Self::Pn => ("PN", "Total Nitrogen", MG_L, "Organic and inorganic nitrogen retained by a filter, as nitrogen."),
            Self::Pon => ("PON", "Organic Nitrogen", MG_L, "Organic nitrogen retained by a filter, as nitrogen."),
            Self::Tdn => ("TDN", "Total Nitrogen", MG_L, "Organic and inorganic nitrogen in filtered samples, as nitrogen."),
            Self::Tkn => ("TKN", "Kjeldahl Nitrogen", MG_L, "Organic nitrogen and total ammonia nitrogen in unfiltered samples, as nitrogen."),
            Self::Tn => ("TN", "Total Nitrogen", MG_L, "Organic and inorganic nitrogen in unfiltered samples, as nitrogen."),
            Self::Ton => ("TON", "Organic Nitrogen", MG_L, "Organic nitrogen in unfiltered samples, as nitrogen."),
            Self::Don => ("DON", "Organic Nitrogen", MG_L, "Organic nitrogen in filtered samples, as nitrogen."),
            Self::Dip => ("DIP", "Phosphate", MG_L, "Acid-hydrolyzable and reactive phosphate in filtered samples, as phosphorus."),
            Self::Drp => ("DRP", "Orthophosphate", MG_L, "Reactive phosphate in filtered samples without digestion, as phosphorus."),
            Self::Tdp => ("TDP", "Phosphorus", MG_L, "Phosphate in filtered samples after oxidative digestion, as phosphorus."),
            Self::Tip => ("TIP", "Phosphate", MG_L, "Acid-hydrolyzable and reactive phosphate in unfiltered samples, as phosphorus."),
            Self::Tp => ("TP", "Phosphorus", MG_L, "Phosphate in unfiltered samples after oxidative digestion, as phosphorus."),
            Self::Trp => ("TRP", "Orthophosphate", MG_L, "Reactive phosphate in unfiltered samples without digestion, as phosphorus."),
            Self::Tpp => ("TPP", "Phosphorus", MG_L, "Phosphate retained by a filter after oxidative digestion, as phosphorus."),
            Self::Bod => ("BOD", "Oxygen Demand", MG_L, "Oxygen consumed during biological decomposition of organic and inorganic matter."),
            Self::Cod => ("COD", "Oxygen Demand", MG_L, "Oxygen consumed during decomposition by a chemical oxidant."),
            Self::O2Dis => ("O2_Dis", "Oxygen", MG_L, "Molecular oxygen dissolved in water."),
            Self::Pv => ("PV", "Oxygen Demand", MG_L, "Material readily oxidisable by permanganate under acidic conditions, as O2."),
            Self::Tds => ("TDS", "Dissolved Solids", MG_L, "Portion of solids that passes through a filter."),
            Self::Ts => ("TS", "Total Solids", MG_L, "Residue left after evaporation and drying of a sample."),
            Self::Tss => ("TSS", "Suspended Solids", MG_L, "Portion of solids retained by a filter."),
            Self::Fds => ("FDS", "Dissolved Solids", MG_L, "Filtered residue remaining after ignition."),
            Self::Fs => ("FS", "Total Solids", MG_L, "Unfiltered residue remaining after ignition."),
            Self::Vds => ("VDS", "Dissolved Solids", MG_L, "Weight loss of dissolved solids on ignition."),
            Self::Vs => ("VS", "Total Solids", MG_L, "Weight loss of total solids on ignition."),
            Self::Trans => ("TRANS", "Transparency", "m", "Depth of light penetration into the water."),
            Self::Turb => ("TURB", "Turbidity", "NTU", "Cloudiness caused by suspended particles."),
            Self::Temp => ("TEMP", "Temperature", "°C", "Water temperature."),
            Self::Ph => ("pH", "pH", "", "Negative logarithm of the hydrogen ion concentration."),
        };
        MeasurementInfo { code, name, unit, description }
    }
}

impl std::fmt::Display for MeasurementCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for MeasurementCode {
    type Err = MeasurementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| MeasurementError::UnknownCode(s.to_string()))
    }
}

impl Serialize for MeasurementCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for MeasurementCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Boundary errors for measurement input.
#[derive(Debug, thiserror::Error)]
pub enum MeasurementError {
    #[error("unrecognized measurement code '{0}'")]
    UnknownCode(String),
}

// ============================================================================
// Measurement bag
// ============================================================================

/// One sample's measurements, keyed by code.
///
/// Absent values are stored as NaN so every code can be queried uniformly;
/// `get` only ever yields finite numbers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measurements {
    values: BTreeMap<MeasurementCode, f64>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loosely typed row, ignoring unrecognized keys.
    pub fn from_raw<K, I>(row: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Option<f64>)>,
    {
        let mut measurements = Self::new();
        for (key, value) in row {
            if let Some(code) = MeasurementCode::from_code(key.as_ref()) {
                measurements.set(code, value.unwrap_or(f64::NAN));
            }
        }
        measurements
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, code: MeasurementCode, value: f64) -> Self {
        self.set(code, value);
        self
    }

    pub fn set(&mut self, code: MeasurementCode, value: f64) {
        self.values.insert(code, value);
    }

    /// Mark a code absent.
    pub fn clear(&mut self, code: MeasurementCode) {
        self.values.insert(code, f64::NAN);
    }

    pub fn get(&self, code: MeasurementCode) -> Option<f64> {
        self.values.get(&code).copied().filter(|v| v.is_finite())
    }

    pub fn is_available(&self, code: MeasurementCode) -> bool {
        self.get(code).is_some()
    }

    /// Codes with a usable value, in vocabulary order.
    pub fn available(&self) -> impl Iterator<Item = (MeasurementCode, f64)> + '_ {
        self.values
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(c, v)| (*c, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.available().next().is_none()
    }
}

impl FromIterator<(MeasurementCode, f64)> for Measurements {
    fn from_iter<T: IntoIterator<Item = (MeasurementCode, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Measurements {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (code, value) in &self.values {
            let value = value.is_finite().then_some(*value);
            map.serialize_entry(code.code(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Measurements {
    /// Wrong-typed values of recognized codes fail here; unknown keys are
    /// skipped whatever their type.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MeasurementsVisitor)
    }
}

struct MeasurementsVisitor;

impl<'de> Visitor<'de> for MeasurementsVisitor {
    type Value = Measurements;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of measurement codes to numbers or null")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut measurements = Measurements::new();
        while let Some(key) = map.next_key::<String>()? {
            match MeasurementCode::from_code(&key) {
                Some(code) => {
                    let value: Option<f64> = map.next_value()?;
                    measurements.set(code, value.unwrap_or(f64::NAN));
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(measurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_codes_are_unique_and_round_trip() {
        for code in MeasurementCode::ALL {
            assert_eq!(MeasurementCode::from_code(code.code()), Some(code));
        }
        let mut codes: Vec<&str> = MeasurementCode::ALL.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), MeasurementCode::ALL.len());
    }

    #[test]
    fn test_units() {
        assert_eq!(MeasurementCode::Trans.info().unit, "m");
        assert_eq!(MeasurementCode::Temp.info().unit, "°C");
        assert_eq!(MeasurementCode::Tn.info().unit, "mg/l");
    }

    #[test]
    fn test_nan_is_absent() {
        let m = Measurements::new()
            .with(MeasurementCode::Tn, f64::NAN)
            .with(MeasurementCode::Tp, 0.02);
        assert!(!m.is_available(MeasurementCode::Tn));
        assert_eq!(m.get(MeasurementCode::Tp), Some(0.02));
        assert_eq!(m.available().count(), 1);
    }

    #[test]
    fn test_from_raw_ignores_unknown_keys() {
        let m = Measurements::from_raw([
            ("TN", Some(0.4)),
            ("station", Some(3.0)),
            ("pH", None),
        ]);
        assert_eq!(m.get(MeasurementCode::Tn), Some(0.4));
        assert!(!m.is_available(MeasurementCode::Ph));
        assert_eq!(m.available().count(), 1);
    }

    #[test]
    fn test_deserialize_rejects_wrong_types() {
        let ok: Measurements =
            serde_json::from_str(r#"{"TN": 0.2, "TP": null, "site": "Lake A"}"#).expect("valid row");
        assert_eq!(ok.get(MeasurementCode::Tn), Some(0.2));

        let bad = serde_json::from_str::<Measurements>(r#"{"TN": "high"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_writes_absent_as_null() {
        let m = Measurements::new()
            .with(MeasurementCode::O2Dis, 8.5)
            .with(MeasurementCode::Bod, f64::NAN);
        let json = serde_json::to_string(&m).expect("serialize");
        assert_eq!(json, r#"{"BOD":null,"O2_Dis":8.5}"#);
    }
}
