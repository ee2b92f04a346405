use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::aggregate::AggregationConfig;
use crate::analysis::{FunnelConfig, HookConfig};
use crate::error::ConfigError;
use crate::recommend::RecommendationConfig;
use crate::scoring::{MomentumConfig, ScoreWeights, ScoringRules};

pub const CONFIG_PATH_ENV: &str = "SENSEI_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/sensei.toml";

/// Every threshold and weight the analysis uses. Missing sections or keys in
/// a TOML file fall back to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub aggregation: AggregationConfig,
    pub weights: ScoreWeights,
    pub momentum: MomentumConfig,
    pub rules: ScoringRules,
    pub recommendations: RecommendationConfig,
    pub funnel: FunnelConfig,
    pub hooks: HookConfig,
}

impl AnalysisConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => Self::read(path)?,
            _ => AnalysisConfig::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());
        Ok((config, config_path))
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = toml::to_string_pretty(self)?;
        std::fs::write(path, payload).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Applies `SENSEI_*` overrides resolved through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SENSEI_WINSORIZE").and_then(|raw| parse_flag(&raw)) {
            self.aggregation.winsorize = value;
        }
        if let Some(value) = lookup("SENSEI_WINSORIZE_PERCENTILE").and_then(|raw| parse_share(&raw)) {
            self.aggregation.winsorize_percentile = value;
        }
        if let Some(value) =
            lookup("SENSEI_NO_CONVERSION_SPEND_SHARE").and_then(|raw| parse_share(&raw))
        {
            self.rules.no_conversion_spend_share = value;
        }
        if let Some(value) = lookup("SENSEI_TESTING_SPEND_SHARE").and_then(|raw| parse_share(&raw)) {
            self.rules.testing_spend_share = value;
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_PATH)))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_share(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (0.0..=1.0).contains(value))
}
