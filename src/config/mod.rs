use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::booking::{
    BookingBackend, ConfirmationWording, FeedbackStyle, FixedOutcomeBackend, FormSettings, RideTypeSet,
    SimulatedBackend, ValidationProfile,
};

/// Latest form iteration, used when nothing else is configured
pub const LATEST_ITERATION: u8 = 4;

/// Outcome override for the booking backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ForcedOutcome {
    Success,
    Failure,
}

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Simulated network delay in milliseconds
    pub submit_delay_ms: u64,

    /// Probability that a simulated booking succeeds
    pub success_rate: f64,

    /// How long an outcome banner stays visible, in milliseconds
    pub banner_timeout_ms: u64,

    pub validation: ValidationProfile,

    pub ride_types: RideTypeSet,

    pub feedback: FeedbackStyle,

    pub wording: ConfirmationWording,

    /// Render the live ride summary under the form
    pub show_summary: bool,

    /// Seed for reproducible booking outcomes
    pub seed: Option<u64>,

    /// Skip the dice roll entirely
    pub outcome: Option<ForcedOutcome>,

    /// Where interactive mode writes its logs
    pub log_file: Option<PathBuf>,

    /// Config file the settings were read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000,
            success_rate: 0.8,
            banner_timeout_ms: 3000,
            validation: ValidationProfile::StrictDistinct,
            ride_types: RideTypeSet::Shared,
            feedback: FeedbackStyle::Dialog,
            wording: ConfirmationWording::RideSpecific,
            show_summary: true,
            seed: None,
            outcome: None,
            log_file: None,
            source: None,
        }
    }
}

/// A configuration layer where every setting is optional
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub iteration: Option<u8>,
    pub submit_delay_ms: Option<u64>,
    pub success_rate: Option<f64>,
    pub banner_timeout_ms: Option<u64>,
    pub validation: Option<ValidationProfile>,
    pub ride_types: Option<RideTypeSet>,
    pub feedback: Option<FeedbackStyle>,
    pub wording: Option<ConfirmationWording>,
    pub show_summary: Option<bool>,
    pub seed: Option<u64>,
    pub outcome: Option<ForcedOutcome>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Initialize configuration from the config file, the environment and the
    /// command line layer, in increasing priority
    pub async fn init(cli_layer: ConfigOverrides) -> Result<Self> {
        let mut layers = Vec::new();
        let mut source = None;

        if let Some((path, file_layer)) = Self::load_from_file().await? {
            source = Some(path);
            layers.push(file_layer);
        }
        layers.push(Self::overrides_from_env(|key| std::env::var(key).ok())?);
        layers.push(cli_layer);

        let mut config = Self::from_layers(layers)?;
        config.source = source;
        Ok(config)
    }

    /// Build a configuration from layers ordered lowest priority first. The
    /// highest layer naming an iteration picks the preset, then every layer's
    /// explicit settings are applied on top of it in order.
    pub fn from_layers(layers: Vec<ConfigOverrides>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(iteration) = layers.iter().rev().find_map(|layer| layer.iteration) {
            config.apply_iteration(iteration)?;
        }
        for layer in layers {
            config.merge_with(layer);
        }
        Ok(config)
    }

    /// Candidate config file locations, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./.ozzirap.json"), PathBuf::from("./ozzirap.json")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ozzirap").join("ozzirap.json"));
        }
        paths
    }

    /// Load the first config file that exists
    pub async fn load_from_file() -> Result<Option<(PathBuf, ConfigOverrides)>> {
        for path in Self::config_paths() {
            if path.exists() {
                let layer = Self::load_from_path(&path).await?;
                return Ok(Some((path, layer)));
            }
        }
        Ok(None)
    }

    pub async fn load_from_path(path: &Path) -> Result<ConfigOverrides> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Read the `OZZIRAP_*` variables through `lookup`
    pub fn overrides_from_env<F>(lookup: F) -> Result<ConfigOverrides>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layer = ConfigOverrides::default();

        if let Some(value) = lookup("OZZIRAP_ITERATION") {
            layer.iteration = Some(value.trim().parse().context("OZZIRAP_ITERATION must be 1-4")?);
        }
        if let Some(value) = lookup("OZZIRAP_SUBMIT_DELAY") {
            layer.submit_delay_ms = Some(parse_millis(&value).context("Invalid OZZIRAP_SUBMIT_DELAY")?);
        }
        if let Some(value) = lookup("OZZIRAP_BANNER_TIMEOUT") {
            layer.banner_timeout_ms = Some(parse_millis(&value).context("Invalid OZZIRAP_BANNER_TIMEOUT")?);
        }
        if let Some(value) = lookup("OZZIRAP_SUCCESS_RATE") {
            layer.success_rate = Some(value.trim().parse().context("Invalid OZZIRAP_SUCCESS_RATE")?);
        }
        if let Some(value) = lookup("OZZIRAP_SEED") {
            layer.seed = Some(value.trim().parse().context("Invalid OZZIRAP_SEED")?);
        }
        if let Some(value) = lookup("OZZIRAP_LOG_FILE") {
            layer.log_file = Some(PathBuf::from(value));
        }

        Ok(layer)
    }

    /// Apply the settings a layer names explicitly. Iteration presets are
    /// resolved by `from_layers`.
    pub fn merge_with(&mut self, other: ConfigOverrides) {
        if let Some(delay) = other.submit_delay_ms {
            self.submit_delay_ms = delay;
        }
        if let Some(rate) = other.success_rate {
            self.success_rate = rate;
        }
        if let Some(timeout) = other.banner_timeout_ms {
            self.banner_timeout_ms = timeout;
        }
        if let Some(validation) = other.validation {
            self.validation = validation;
        }
        if let Some(ride_types) = other.ride_types {
            self.ride_types = ride_types;
        }
        if let Some(feedback) = other.feedback {
            self.feedback = feedback;
        }
        if let Some(wording) = other.wording {
            self.wording = wording;
        }
        if let Some(show_summary) = other.show_summary {
            self.show_summary = show_summary;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.outcome.is_some() {
            self.outcome = other.outcome;
        }
        if other.log_file.is_some() {
            self.log_file = other.log_file;
        }
    }

    /// Reproduce one of the historical versions of the form
    pub fn apply_iteration(&mut self, iteration: u8) -> Result<()> {
        let (validation, ride_types, feedback, wording, simulated) = match iteration {
            1 => (
                ValidationProfile::Basic,
                RideTypeSet::Classic,
                FeedbackStyle::Dialog,
                ConfirmationWording::Fixed,
                false,
            ),
            2 => (
                ValidationProfile::Strict,
                RideTypeSet::Classic,
                FeedbackStyle::InlineBanner,
                ConfirmationWording::Fixed,
                false,
            ),
            3 => (
                ValidationProfile::Strict,
                RideTypeSet::Shared,
                FeedbackStyle::Banner,
                ConfirmationWording::RideSpecific,
                true,
            ),
            4 => (
                ValidationProfile::StrictDistinct,
                RideTypeSet::Shared,
                FeedbackStyle::Dialog,
                ConfirmationWording::RideSpecific,
                true,
            ),
            other => return Err(anyhow!("Unknown form iteration {}, expected 1-{}", other, LATEST_ITERATION)),
        };

        let defaults = Self::default();
        self.validation = validation;
        self.ride_types = ride_types;
        self.feedback = feedback;
        self.wording = wording;
        self.show_summary = iteration == LATEST_ITERATION;
        if simulated {
            self.submit_delay_ms = defaults.submit_delay_ms;
            self.success_rate = defaults.success_rate;
        } else {
            // Early versions booked synchronously and never failed
            self.submit_delay_ms = 0;
            self.success_rate = 1.0;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.success_rate) {
            return Err(anyhow!("success_rate must be between 0.0 and 1.0"));
        }
        if self.feedback == FeedbackStyle::Banner && self.banner_timeout_ms == 0 {
            return Err(anyhow!("banner_timeout_ms must be greater than 0"));
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn banner_timeout(&self) -> Duration {
        Duration::from_millis(self.banner_timeout_ms)
    }

    pub fn form_settings(&self) -> FormSettings {
        FormSettings {
            profile: self.validation,
            rides: self.ride_types,
            feedback: self.feedback,
            wording: self.wording,
            show_summary: self.show_summary,
        }
    }

    /// Build the booking backend described by this configuration
    pub fn backend(&self) -> Arc<dyn BookingBackend> {
        let delay = self.submit_delay();
        match (self.outcome, self.seed) {
            (Some(ForcedOutcome::Success), _) => Arc::new(FixedOutcomeBackend::succeeding(delay)),
            (Some(ForcedOutcome::Failure), _) => Arc::new(FixedOutcomeBackend::failing(delay)),
            (None, Some(seed)) => Arc::new(SimulatedBackend::with_seed(delay, self.success_rate, seed)),
            (None, None) => Arc::new(SimulatedBackend::new(delay, self.success_rate)),
        }
    }
}

/// Milliseconds from either a bare number or a humantime duration such as `2s`
pub fn parse_millis(value: &str) -> Result<u64> {
    let value = value.trim();
    if let Ok(millis) = value.parse::<u64>() {
        return Ok(millis);
    }
    let duration = humantime::parse_duration(value)?;
    Ok(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.submit_delay(), Duration::from_millis(2000));
        assert_eq!(config.success_rate, 0.8);
        assert_eq!(config.validation, ValidationProfile::StrictDistinct);
        assert_eq!(config.feedback, FeedbackStyle::Dialog);
        assert!(config.show_summary);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_partial_file_layer() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("ozzirap.json");
        std::fs::write(&path, r#"{ "success_rate": 0.5, "feedback": "banner" }"#).unwrap();

        let layer = Config::load_from_path(&path).await.unwrap();
        let config = Config::from_layers(vec![layer]).unwrap();

        assert_eq!(config.success_rate, 0.5);
        assert_eq!(config.feedback, FeedbackStyle::Banner);
        assert_eq!(config.submit_delay_ms, 2000);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("ozzirap.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from_path(&path).await.is_err());
    }

    #[test]
    fn test_env_layer() {
        let vars: HashMap<&str, &str> = [
            ("OZZIRAP_SUBMIT_DELAY", "1s 500ms"),
            ("OZZIRAP_BANNER_TIMEOUT", "250"),
            ("OZZIRAP_SEED", "7"),
        ]
        .into_iter()
        .collect();

        let layer = Config::overrides_from_env(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(layer.submit_delay_ms, Some(1500));
        assert_eq!(layer.banner_timeout_ms, Some(250));
        assert_eq!(layer.seed, Some(7));
        assert!(layer.success_rate.is_none());

        let bad = Config::overrides_from_env(|key| (key == "OZZIRAP_SUCCESS_RATE").then(|| "often".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_iteration_presets() {
        let config = Config::from_layers(vec![ConfigOverrides {
            iteration: Some(1),
            ..ConfigOverrides::default()
        }])
        .unwrap();
        assert_eq!(config.validation, ValidationProfile::Basic);
        assert_eq!(config.ride_types, RideTypeSet::Classic);
        assert_eq!(config.wording, ConfirmationWording::Fixed);
        assert_eq!(config.submit_delay_ms, 0);
        assert_eq!(config.success_rate, 1.0);
        assert!(!config.show_summary);

        let config = Config::from_layers(vec![ConfigOverrides {
            iteration: Some(2),
            ..ConfigOverrides::default()
        }])
        .unwrap();
        assert_eq!(config.feedback, FeedbackStyle::InlineBanner);

        // Settings in the same layer win over the preset
        let config = Config::from_layers(vec![ConfigOverrides {
            iteration: Some(3),
            submit_delay_ms: Some(10),
            ..ConfigOverrides::default()
        }])
        .unwrap();
        assert_eq!(config.feedback, FeedbackStyle::Banner);
        assert_eq!(config.submit_delay_ms, 10);
        assert_eq!(config.success_rate, 0.8);

        let mut config = Config::default();
        assert!(config.apply_iteration(5).is_err());
    }

    #[test]
    fn test_iteration_from_a_higher_layer_keeps_lower_settings() {
        let vars: HashMap<&str, &str> = [("OZZIRAP_SUBMIT_DELAY", "500"), ("OZZIRAP_SUCCESS_RATE", "0.3")]
            .into_iter()
            .collect();
        let env_layer = Config::overrides_from_env(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        let cli_layer = ConfigOverrides {
            iteration: Some(4),
            ..ConfigOverrides::default()
        };

        let config = Config::from_layers(vec![env_layer, cli_layer]).unwrap();
        assert_eq!(config.submit_delay_ms, 500);
        assert_eq!(config.success_rate, 0.3);
        assert_eq!(config.validation, ValidationProfile::StrictDistinct);
    }

    #[tokio::test]
    async fn test_file_settings_survive_env_iteration() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("ozzirap.json");
        std::fs::write(&path, r#"{ "submit_delay_ms": 500, "feedback": "dialog" }"#).unwrap();
        let file_layer = Config::load_from_path(&path).await.unwrap();
        let env_layer =
            Config::overrides_from_env(|key| (key == "OZZIRAP_ITERATION").then(|| "3".to_string())).unwrap();

        let config = Config::from_layers(vec![file_layer, env_layer, ConfigOverrides::default()]).unwrap();
        assert_eq!(config.submit_delay_ms, 500);
        assert_eq!(config.feedback, FeedbackStyle::Dialog);
        assert_eq!(config.ride_types, RideTypeSet::Shared);
        assert!(!config.show_summary);
    }

    #[test]
    fn test_highest_iteration_wins() {
        let file_layer = ConfigOverrides {
            iteration: Some(1),
            ..ConfigOverrides::default()
        };
        let cli_layer = ConfigOverrides {
            iteration: Some(3),
            ..ConfigOverrides::default()
        };
        let config = Config::from_layers(vec![file_layer, cli_layer]).unwrap();
        assert_eq!(config.validation, ValidationProfile::Strict);
        assert_eq!(config.submit_delay_ms, 2000);
    }

    #[test]
    fn test_validation_rejects_bad_rate() {
        let config = Config {
            success_rate: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_millis() {
        assert_eq!(parse_millis("2000").unwrap(), 2000);
        assert_eq!(parse_millis("2s").unwrap(), 2000);
        assert!(parse_millis("soon").is_err());
    }
}
