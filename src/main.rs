//! Eutrophia - trophic state of water bodies from physico-chemical samples
//!
//! # Usage
//!
//! ```bash
//! # Run the full cascade on a JSON array of samples
//! eutrophia infer --input samples.json
//!
//! # Stop after phase 2, Spanish labels, read from stdin
//! cat samples.json | eutrophia infer --input - --phase 2 --locale es
//!
//! # Compare the engine's labels with Carlson's TSI
//! eutrophia evaluate --input samples.json
//!
//! # Label a forecast value
//! eutrophia label --indicator eutrophication_level --value 0.62
//! ```
//!
//! # Environment Variables
//!
//! - `EUTROPHIA_CONFIG`: Path to a TOML config file (default: ./eutrophia.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use eutrophia::config::{self, EutrophiaConfig};
use eutrophia::{
    evaluate, Chain, Engine, IndicatorKind, Locale, Measurements, PhaseDepth,
};
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "eutrophia")]
#[command(about = "Cascading fuzzy inference of the trophic state of water bodies")]
#[command(version)]
struct CliArgs {
    /// Config file (overrides EUTROPHIA_CONFIG and ./eutrophia.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the cascade on a JSON array of measurement objects
    Infer {
        /// Input file, or "-" for stdin
        #[arg(long, short)]
        input: String,
        /// Number of phases to run (1-4)
        #[arg(long)]
        phase: Option<u8>,
        /// Spread rows over all cores
        #[arg(long)]
        parallel: bool,
        #[arg(long)]
        locale: Option<Locale>,
        /// Indented JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Run the cascade, then score its labels against Carlson's TSI
    Evaluate {
        /// Input file, or "-" for stdin
        #[arg(long, short)]
        input: String,
        #[arg(long)]
        locale: Option<Locale>,
        #[arg(long)]
        pretty: bool,
    },

    /// Label a crisp value with an indicator's output terms
    Label {
        /// Indicator key, e.g. nutrient_level
        #[arg(long)]
        indicator: String,
        #[arg(long)]
        value: f64,
        #[arg(long)]
        locale: Option<Locale>,
    },

    /// Print the variables, strategies and confidences of the indicators
    Describe {
        /// Only this indicator
        #[arg(long)]
        indicator: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Also write it to this file
        #[arg(long, value_name = "PATH")]
        dump: Option<PathBuf>,
    },
}

// ============================================================================
// Input / Output
// ============================================================================

fn read_rows(input: &str) -> Result<Vec<Measurements>> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read samples from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
    };
    serde_json::from_str(&text).with_context(|| format!("Malformed samples in {input}"))
}

fn print_json(value: &impl serde::Serialize, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

/// Chain as JSON with indicator names and labels in `locale`.
fn render_chain(row: usize, chain: &Chain, locale: Locale) -> Value {
    let indicators: Vec<Value> = chain
        .results
        .iter()
        .map(|(kind, r)| {
            json!({
                "indicator": kind.key(),
                "name": locale.indicator(*kind),
                "value": r.value,
                "label": locale.label(r.label),
                "confidence": r.confidence,
                "calculation_method": r.calculation_method.unwrap_or("-"),
                "used_variables": r.used_variables,
            })
        })
        .collect();
    let errors: serde_json::Map<String, Value> = chain
        .errors
        .iter()
        .map(|(kind, failure)| (kind.key().to_string(), json!(failure)))
        .collect();

    json!({
        "row": row,
        "indicators": indicators,
        "errors": errors,
        "phases": chain.phases,
        "final_confidence": chain.final_confidence(),
    })
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_batch(engine: &Engine, rows: &[Measurements], depth: PhaseDepth, parallel: bool) -> Vec<Chain> {
    if parallel {
        engine.infer_batch_parallel(rows, depth)
    } else {
        engine.infer_batch(rows, depth)
    }
}

fn cmd_infer(
    cfg: &EutrophiaConfig,
    input: &str,
    phase: Option<u8>,
    parallel: bool,
    locale: Locale,
    pretty: bool,
) -> Result<()> {
    let depth = match phase {
        Some(p) => PhaseDepth::try_from(p)?,
        None => cfg.engine.phase_depth()?,
    };
    let rows = read_rows(input)?;
    let engine = Engine::from_config(cfg);
    let parallel = parallel || cfg.batch.use_parallel(rows.len());

    let chains = run_batch(&engine, &rows, depth, parallel);
    let rendered: Vec<Value> = chains
        .iter()
        .enumerate()
        .map(|(i, c)| render_chain(i, c, locale))
        .collect();
    print_json(&rendered, pretty)
}

fn cmd_evaluate(cfg: &EutrophiaConfig, input: &str, locale: Locale, pretty: bool) -> Result<()> {
    let rows = read_rows(input)?;
    let engine = Engine::from_config(cfg);
    let chains = run_batch(&engine, &rows, PhaseDepth::FULL, cfg.batch.use_parallel(rows.len()));
    let report = evaluate(&rows, &chains);

    let outcomes: Vec<Value> = report
        .rows
        .iter()
        .map(|o| {
            json!({
                "row": o.row,
                "inferred": locale.term(o.inferred),
                "reference": locale.term(o.reference),
                "tsi": o.matched.map_or("FAIL", |i| i.as_str()),
                "index": o.tsi,
            })
        })
        .collect();

    print_json(
        &json!({
            "rows": outcomes,
            "real": report.real,
            "exact": report.exact,
            "fails": report.fails(),
            "precision": report.precision,
            "aptitude": locale.aptitude(report.aptitude),
            "generated_at": report.generated_at,
        }),
        pretty,
    )
}

fn cmd_label(cfg: &EutrophiaConfig, indicator: &str, value: f64, locale: Locale) -> Result<()> {
    if !value.is_finite() {
        bail!("value must be a finite number, got {value}");
    }
    let engine = Engine::from_config(cfg);
    let term = engine.label_for_key(indicator, value)?;
    println!("{}", locale.label(term));
    Ok(())
}

fn cmd_describe(cfg: &EutrophiaConfig, only: Option<&str>) -> Result<()> {
    let only = only
        .map(|key| {
            IndicatorKind::from_key(key)
                .ok_or_else(|| eutrophia::EngineError::UnknownIndicator(key.to_string()))
        })
        .transpose()?;

    let engine = Engine::from_config(cfg);
    let described: Vec<Value> = engine
        .indicators()
        .iter()
        .filter(|i| only.map_or(true, |k| i.kind() == k))
        .map(|i| {
            let model = i.model();
            let strategies: Vec<Value> = model
                .resolver()
                .strategies()
                .iter()
                .map(|s| {
                    json!({
                        "method": s.method,
                        "confidence": s.confidence,
                        "inputs": model.unit(s.method).map(|u| u.inputs()),
                    })
                })
                .collect();
            json!({
                "indicator": i.kind().key(),
                "phase": i.kind().phase().number(),
                "priority": model.resolver().priority(),
                "strategies": strategies,
                "output": model.output(),
            })
        })
        .collect();
    print_json(&described, true)
}

fn cmd_config(cfg: &EutrophiaConfig, dump: Option<&Path>) -> Result<()> {
    print!("{}", cfg.to_toml()?);
    if let Some(path) = dump {
        cfg.save_to_file(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let loaded = match &args.config {
        Some(path) => EutrophiaConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EutrophiaConfig::load(),
    };
    info!(
        phase_depth = loaded.engine.phase_depth,
        nutrients_require_both = loaded.engine.nutrients_require_both,
        locale = %loaded.output.locale,
        "Configuration ready"
    );
    config::init(loaded);
    let cfg = config::get();
    let default_locale = cfg.output.locale;

    match args.command {
        SubCommand::Infer {
            input,
            phase,
            parallel,
            locale,
            pretty,
        } => cmd_infer(
            cfg,
            &input,
            phase,
            parallel,
            locale.unwrap_or(default_locale),
            pretty || cfg.output.pretty,
        ),
        SubCommand::Evaluate {
            input,
            locale,
            pretty,
        } => cmd_evaluate(
            cfg,
            &input,
            locale.unwrap_or(default_locale),
            pretty || cfg.output.pretty,
        ),
        SubCommand::Label {
            indicator,
            value,
            locale,
        } => cmd_label(cfg, &indicator, value, locale.unwrap_or(default_locale)),
        SubCommand::Describe { indicator } => cmd_describe(cfg, indicator.as_deref()),
        SubCommand::Config { dump } => cmd_config(cfg, dump.as_deref()),
    }
}
