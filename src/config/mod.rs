//! Configuration loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `EUTROPHIA_CONFIG` environment variable (path to TOML file)
//! 2. `eutrophia.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The binary calls `config::init()` once at startup; library users may
//! instead build an [`Engine`](crate::Engine) straight from a config value.
//!
//! ```ignore
//! config::init(EutrophiaConfig::load());
//! let depth = config::get().engine.phase_depth()?;
//! ```

mod eutrophia_config;
pub mod defaults;
pub mod validation;

pub use eutrophia_config::*;

use std::sync::OnceLock;

static CONFIG: OnceLock<EutrophiaConfig> = OnceLock::new();

/// Initialize the global configuration. Later calls are ignored.
pub fn init(config: EutrophiaConfig) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// The global configuration, or the built-in defaults when `init()` has not
/// been called.
pub fn get() -> &'static EutrophiaConfig {
    CONFIG.get_or_init(|| {
        tracing::warn!("config::get() called before config::init(), using defaults");
        EutrophiaConfig::default()
    })
}

pub fn is_initialized() -> bool {
    CONFIG.get().is_some()
}
