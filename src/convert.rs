//! Pure conversion functions: TOML config structs -> crate API types.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use aitrends_io::ReaderConfig;
use aitrends_markov::{Distribution, MarkovConfig, StateSet};

use crate::config::{ChainToml, DataToml, StateToml};

/// Builds the ordered [`StateSet`] from the `[[states]]` entries.
pub fn build_state_set(states: &[StateToml]) -> Result<StateSet> {
    if states.is_empty() {
        bail!("no states configured: add at least one [[states]] entry");
    }
    StateSet::new(states.iter().map(|s| s.name.as_str())).context("invalid [[states]] list")
}

/// Builds the initial [`Distribution`] from the `[[states]]` entries.
///
/// Weights that do not sum to 1 are renormalized with a warning.
pub fn build_initial(states: &[StateToml]) -> Result<Distribution> {
    let weights: Vec<f64> = states.iter().map(|s| s.initial).collect();
    Distribution::from_slice(&weights).context("invalid initial probabilities in [[states]]")
}

/// Builds a [`MarkovConfig`] from the TOML chain configuration.
pub fn build_markov_config(chain: &ChainToml) -> Result<MarkovConfig> {
    let cfg = MarkovConfig::new().with_smoothing(chain.smoothing);
    cfg.validate().context("invalid [chain] settings")?;
    Ok(cfg)
}

/// Builds a [`ReaderConfig`] from the TOML data configuration.
pub fn build_reader_config(data: &DataToml) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default()
        .with_delimiter(data.delimiter)
        .with_header(data.has_header);
    cfg.validate().context("invalid [data] settings")?;
    Ok(cfg)
}

/// Resolves the sequence file: the CLI override wins over the config.
pub fn resolve_data_path(data: &DataToml, cli_override: Option<PathBuf>) -> PathBuf {
    cli_override.unwrap_or_else(|| data.sequences.clone())
}
