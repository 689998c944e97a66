//! Default settings for the `bingo` binary.
//!
//! Resolution order, lowest to highest: built-in defaults, the TOML file named
//! by `BINGO_CONFIG`, `BINGO_*` environment variables, then command-line flags
//! (applied by the CLI layer).

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::core::batch::DEFAULT_ATTEMPTS_PER_CARD;

pub const CONFIG_ENV: &str = "BINGO_CONFIG";
pub const SEED_ENV: &str = "BINGO_SEED";
pub const DPI_ENV: &str = "BINGO_DPI";
pub const OUTPUT_ENV: &str = "BINGO_OUTPUT";
pub const ATTEMPTS_ENV: &str = "BINGO_ATTEMPTS_PER_CARD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub seed: Option<u64>,
    pub dpi: u32,
    pub output: PathBuf,
    pub attempts_per_card: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            dpi: 150,
            output: PathBuf::from("output"),
            attempts_per_card: DEFAULT_ATTEMPTS_PER_CARD,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    seed: Option<u64>,
    dpi: Option<u32>,
    output: Option<PathBuf>,
    attempts_per_card: Option<usize>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(path) = non_empty(lookup(CONFIG_ENV)) {
            let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            settings.apply_toml(&path, &text)?;
        }

        if let Some(seed) = non_empty(lookup(SEED_ENV)) {
            settings.seed = Some(parse(SEED_ENV, &seed)?);
        }
        if let Some(dpi) = non_empty(lookup(DPI_ENV)) {
            settings.dpi = parse(DPI_ENV, &dpi)?;
        }
        if let Some(output) = non_empty(lookup(OUTPUT_ENV)) {
            settings.output = PathBuf::from(output);
        }
        if let Some(attempts) = non_empty(lookup(ATTEMPTS_ENV)) {
            settings.attempts_per_card = parse(ATTEMPTS_ENV, &attempts)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn apply_toml(&mut self, path: &str, text: &str) -> Result<(), ConfigError> {
        let file: FileSettings = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        if let Some(seed) = file.seed {
            self.seed = Some(seed);
        }
        if let Some(dpi) = file.dpi {
            self.dpi = dpi;
        }
        if let Some(output) = file.output {
            self.output = output;
        }
        if let Some(attempts) = file.attempts_per_card {
            self.attempts_per_card = attempts;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts_per_card == 0 {
            return Err(ConfigError::Invalid {
                key: "attempts_per_card",
                value: self.attempts_per_card.to_string(),
            });
        }
        if self.dpi == 0 {
            return Err(ConfigError::Invalid {
                key: "dpi",
                value: self.dpi.to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_any_source() {
        let settings = Settings::resolve(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.attempts_per_card, 100);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bingo.toml");
        fs::write(&path, "seed = 7\ndpi = 200\noutput = \"cards\"\n").unwrap();
        let path_str = path.to_string_lossy().into_owned();
        let settings = Settings::resolve(lookup(&[
            (CONFIG_ENV, path_str.as_str()),
            (DPI_ENV, "300"),
        ]))
        .unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.dpi, 300);
        assert_eq!(settings.output, PathBuf::from("cards"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let settings = Settings::resolve(lookup(&[(SEED_ENV, "  ")])).unwrap();
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn invalid_env_value_is_reported() {
        let err = Settings::resolve(lookup(&[(SEED_ENV, "abc")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"abc\" for BINGO_SEED");
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = Settings::resolve(lookup(&[(ATTEMPTS_ENV, "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "attempts_per_card",
                ..
            }
        ));
    }

    #[test]
    fn unknown_file_keys_fail_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bingo.toml");
        fs::write(&path, "players = 4\n").unwrap();
        let path_str = path.to_string_lossy().into_owned();
        let err = Settings::resolve(lookup(&[(CONFIG_ENV, path_str.as_str())])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Settings::resolve(lookup(&[(CONFIG_ENV, "/no/such/bingo.toml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
