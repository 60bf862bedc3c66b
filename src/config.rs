use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level aitrends configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AitrendsConfig {
    /// Sequence file settings.
    #[serde(default)]
    pub data: DataToml,

    /// Chain estimation settings.
    #[serde(default)]
    pub chain: ChainToml,

    /// Ordered states with their initial probabilities.
    #[serde(default = "default_states")]
    pub states: Vec<StateToml>,
}

impl Default for AitrendsConfig {
    fn default() -> Self {
        Self {
            data: DataToml::default(),
            chain: ChainToml::default(),
            states: default_states(),
        }
    }
}

impl AitrendsConfig {
    /// Reads a TOML config file, or returns the built-in defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataToml {
    #[serde(default = "default_sequences")]
    pub sequences: PathBuf,
    #[serde(default = "default_true")]
    pub has_header: bool,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for DataToml {
    fn default() -> Self {
        Self {
            sequences: default_sequences(),
            has_header: true,
            delimiter: default_delimiter(),
        }
    }
}

fn default_sequences() -> PathBuf {
    PathBuf::from("datos_ia_realistas.csv")
}
fn default_true() -> bool {
    true
}
fn default_delimiter() -> char {
    ','
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainToml {
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
}

impl Default for ChainToml {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
        }
    }
}

fn default_smoothing() -> f64 {
    1.0
}

/// One `[[states]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateToml {
    pub name: String,
    pub initial: f64,
}

fn default_states() -> Vec<StateToml> {
    [
        ("OpenAI", 0.3),
        ("GoogleAI", 0.25),
        ("Anthropic", 0.15),
        ("Cohere", 0.2),
        ("HuggingFace", 0.1),
    ]
    .into_iter()
    .map(|(name, initial)| StateToml {
        name: name.to_string(),
        initial,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg: AitrendsConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.data.sequences, PathBuf::from("datos_ia_realistas.csv"));
        assert!(cfg.data.has_header);
        assert_eq!(cfg.data.delimiter, ',');
        assert_eq!(cfg.chain.smoothing, 1.0);
        let names: Vec<_> = cfg.states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["OpenAI", "GoogleAI", "Anthropic", "Cohere", "HuggingFace"]
        );
        let total: f64 = cfg.states.iter().map(|s| s.initial).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn full_toml_parsed() {
        let cfg: AitrendsConfig = toml::from_str(
            r#"
            [data]
            sequences = "visits.csv"
            has_header = false
            delimiter = ";"

            [chain]
            smoothing = 0.5

            [[states]]
            name = "A"
            initial = 0.7

            [[states]]
            name = "B"
            initial = 0.3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.data.sequences, PathBuf::from("visits.csv"));
        assert!(!cfg.data.has_header);
        assert_eq!(cfg.data.delimiter, ';');
        assert_eq!(cfg.chain.smoothing, 0.5);
        assert_eq!(cfg.states.len(), 2);
        assert_eq!(cfg.states[1].name, "B");
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<AitrendsConfig>("[chain]\nalpha = 1.0\n").is_err());
        assert!(toml::from_str::<AitrendsConfig>("seed = 4\n").is_err());
    }

    #[test]
    fn load_without_path_is_default() {
        let cfg = AitrendsConfig::load(None).unwrap();
        assert_eq!(cfg.states.len(), 5);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chain]\nsmoothing = 2.0").unwrap();
        let cfg = AitrendsConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.chain.smoothing, 2.0);
        assert_eq!(cfg.states.len(), 5);
    }

    #[test]
    fn load_missing_file_has_context() {
        let err = AitrendsConfig::load(Some(Path::new("/no/such/aitrends.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
