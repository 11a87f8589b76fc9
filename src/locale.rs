//! Display strings for English and Spanish reports.
//!
//! Computation never depends on the locale; only rendered names and labels
//! change.

use crate::evaluation::Aptitude;
use crate::types::{IndicatorKind, Term, UNKNOWN_LABEL};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
}

impl Locale {
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
        }
    }

    pub const fn indicator(self, kind: IndicatorKind) -> &'static str {
        use IndicatorKind::{
            AdditionalConditions, ChemicalConditions, EutrophicationLevel, NitrogenLevel,
            NutrientLevel, OxygenBalance, PhosphorusLevel, PhysicalConditions, SolidsLevel,
            VisibilityLevel,
        };
        match self {
            Self::English => match kind {
                NitrogenLevel => "NITROGEN LEVEL",
                PhosphorusLevel => "PHOSPHORUS LEVEL",
                OxygenBalance => "OXYGEN BALANCE",
                SolidsLevel => "SOLIDS LEVEL",
                VisibilityLevel => "VISIBILITY LEVEL",
                AdditionalConditions => "ADDITIONAL CONDITIONS",
                NutrientLevel => "NUTRIENT LEVEL",
                PhysicalConditions => "PHYSICAL CONDITIONS",
                ChemicalConditions => "CHEMICAL CONDITIONS",
                EutrophicationLevel => "EUTROPHICATION LEVEL",
            },
            Self::Spanish => match kind {
                NitrogenLevel => "NIVEL DE NITRÓGENO",
                PhosphorusLevel => "NIVEL DE FÓSFORO",
                OxygenBalance => "BALANCE DE OXÍGENO",
                SolidsLevel => "NIVEL DE SÓLIDOS",
                VisibilityLevel => "NIVEL DE VISIBILIDAD",
                AdditionalConditions => "CONDICIONES ADICIONALES",
                NutrientLevel => "NIVEL DE NUTRIENTES",
                PhysicalConditions => "CONDICIONES FÍSICAS",
                ChemicalConditions => "CONDICIONES QUÍMICAS",
                EutrophicationLevel => "NIVEL DE EUTROFIZACIÓN",
            },
        }
    }

    pub const fn term(self, term: Term) -> &'static str {
        match self {
            Self::English => term.as_str(),
            Self::Spanish => match term {
                Term::VeryLow => "MUY BAJO",
                Term::Low => "BAJO",
                Term::Moderate => "MODERADO",
                Term::High => "ALTO",
                Term::VeryHigh => "MUY ALTO",
                Term::Good => "BUENO",
                Term::Neutral => "NEUTRAL",
                Term::Bad => "MALO",
                Term::VeryBad => "MUY MALO",
                Term::Acid => "ÁCIDO",
                Term::Alkaline => "ALCALINO",
                Term::Unfavorable => "DESFAVORABLE",
                Term::Favorable => "FAVORABLE",
                Term::Oligotrophic => "OLIGOTRÓFICO",
                Term::Mesotrophic => "MESOTRÓFICO",
                Term::Eutrophic => "EUTRÓFICO",
                Term::Hypereutrophic => "HIPEREUTRÓFICO",
            },
        }
    }

    /// Label of a possibly undefined result.
    pub const fn label(self, term: Option<Term>) -> &'static str {
        match (term, self) {
            (Some(t), _) => self.term(t),
            (None, Self::English) => UNKNOWN_LABEL,
            (None, Self::Spanish) => "DESCONOCIDO",
        }
    }

    pub const fn aptitude(self, aptitude: Aptitude) -> &'static str {
        match self {
            Self::English => aptitude.as_str(),
            Self::Spanish => match aptitude {
                Aptitude::Insufficient => "INSUFICIENTE",
                Aptitude::Acceptable => "ACEPTABLE",
                Aptitude::Good => "BUENO",
                Aptitude::Excellent => "EXCELENTE",
            },
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "es" | "spanish" | "español" => Ok(Self::Spanish),
            other => Err(format!("unsupported locale '{other}' (expected 'en' or 'es')")),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
