//! Eutrophia configuration: engine switches, batch execution and output
//! formatting as TOML values.
//!
//! Each section implements `Default` with the built-in values from
//! [`super::defaults`], so a missing file or a partial file behaves exactly
//! like the defaults for every key it leaves out.

use super::defaults;
use crate::engine::PhaseDepth;
use crate::error::EngineError;
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `EutrophiaConfig::load()` which searches:
/// 1. `$EUTROPHIA_CONFIG` env var
/// 2. `./eutrophia.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EutrophiaConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl EutrophiaConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::CONFIG_FILE_NAME);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, source) => ConfigError::Parse(path.to_path_buf(), source),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys are logged, not rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Check value ranges, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if let Err(e) = self.engine.phase_depth() {
            errors.push(format!("engine.phase_depth: {e}"));
        }
        if self.batch.min_parallel_rows == 0 {
            errors.push("batch.min_parallel_rows must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            Self::Parse(path, e) if path.as_os_str().is_empty() => {
                write!(f, "Config parse error: {e}")
            }
            Self::Parse(path, e) => write!(f, "Config parse error ({}): {}", path.display(), e),
            Self::Serialize(e) => write!(f, "Config serialization error: {e}"),
            Self::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, e) => Some(e),
            Self::Parse(_, e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// `[engine]`: how the cascade is built and how far it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Phases to run, 1 through 4.
    #[serde(default = "default_phase_depth")]
    pub phase_depth: u8,

    #[serde(default = "default_nutrients_require_both")]
    pub nutrients_require_both: bool,

    #[serde(default = "default_clamp_inputs")]
    pub clamp_inputs: bool,
}

const fn default_phase_depth() -> u8 {
    defaults::PHASE_DEPTH
}
const fn default_nutrients_require_both() -> bool {
    defaults::NUTRIENTS_REQUIRE_BOTH
}
const fn default_clamp_inputs() -> bool {
    defaults::CLAMP_INPUTS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            phase_depth: default_phase_depth(),
            nutrients_require_both: default_nutrients_require_both(),
            clamp_inputs: default_clamp_inputs(),
        }
    }
}

impl EngineConfig {
    pub fn phase_depth(&self) -> Result<PhaseDepth, EngineError> {
        PhaseDepth::try_from(self.phase_depth)
    }
}

/// `[batch]`: multi-row execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Spread rows over the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default = "default_min_parallel_rows")]
    pub min_parallel_rows: usize,
}

const fn default_parallel() -> bool {
    defaults::BATCH_PARALLEL
}
const fn default_min_parallel_rows() -> usize {
    defaults::MIN_PARALLEL_ROWS
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            min_parallel_rows: default_min_parallel_rows(),
        }
    }
}

impl BatchConfig {
    /// Whether a batch of `rows` samples should run in parallel.
    pub const fn use_parallel(&self, rows: usize) -> bool {
        self.parallel && rows >= self.min_parallel_rows
    }
}

/// `[output]`: how results are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub locale: Locale,

    /// Indented JSON.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

const fn default_pretty() -> bool {
    defaults::PRETTY_OUTPUT
}

// ============================================================================
// Tests
// ============================================================================
