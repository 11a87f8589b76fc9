//! Built-in default values for every configuration key.

// ============================================================================
// Engine
// ============================================================================

/// Number of cascade phases run by default (all of them).
pub const PHASE_DEPTH: u8 = 4;

/// Nutrient level needs both nitrogen and phosphorus levels.
pub const NUTRIENTS_REQUIRE_BOTH: bool = true;

/// Out-of-universe inputs are clipped to the universe bounds.
pub const CLAMP_INPUTS: bool = true;

// ============================================================================
// Batch
// ============================================================================

pub const BATCH_PARALLEL: bool = false;

/// Below this many rows a parallel batch still runs sequentially.
pub const MIN_PARALLEL_ROWS: usize = 64;

// ============================================================================
// Output
// ============================================================================

pub const PRETTY_OUTPUT: bool = false;

// ============================================================================
// Environment
// ============================================================================

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "EUTROPHIA_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "eutrophia.toml";
