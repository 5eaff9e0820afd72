use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub anomaly_detection: AnomalyDetectionConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

// ============================================================
// Anomaly Detection Config
// ============================================================

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnomalyDetectionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub frequency: FrequencyConfig,
    #[serde(default)]
    pub value_outlier: ValueOutlierConfig,
    #[serde(default)]
    pub gas: GasConfig,
}

impl Default for AnomalyDetectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: FrequencyConfig::default(),
            value_outlier: ValueOutlierConfig::default(),
            gas: GasConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// High-frequency burst: more than `max_transactions` inside the trailing window.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FrequencyConfig {
    #[serde(default = "default_frequency_window")]
    pub window_secs: u64,
    #[serde(default = "default_frequency_max")]
    pub max_transactions: usize,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            window_secs: 86_400,
            max_transactions: 100,
        }
    }
}

fn default_frequency_window() -> u64 {
    86_400
}

fn default_frequency_max() -> usize {
    100
}

/// Value outliers: deviation from the mean beyond `sigma_threshold` standard deviations.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ValueOutlierConfig {
    #[serde(default = "default_sigma_threshold")]
    pub sigma_threshold: f64,
}

impl Default for ValueOutlierConfig {
    fn default() -> Self {
        Self {
            sigma_threshold: 3.0,
        }
    }
}

fn default_sigma_threshold() -> f64 {
    3.0
}

/// Gas spikes: more than `max_high_gas_transactions` priced above
/// `price_multiplier` times the mean gas price.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GasConfig {
    #[serde(default = "default_gas_multiplier")]
    pub price_multiplier: f64,
    #[serde(default = "default_gas_max")]
    pub max_high_gas_transactions: usize,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            price_multiplier: 2.0,
            max_high_gas_transactions: 5,
        }
    }
}

fn default_gas_multiplier() -> f64 {
    2.0
}

fn default_gas_max() -> usize {
    5
}

// ============================================================
// API Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_api_host")]
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

fn default_api_port() -> u16 {
    3000
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but falls back to defaults when the file is absent.
    pub fn load_or_default(path: &str) -> eyre::Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::warn!(path, "Config file not found, using default thresholds");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        let detection = &self.anomaly_detection;
        if detection.frequency.window_secs == 0 {
            return Err(eyre::eyre!("frequency.window_secs must be greater than zero"));
        }
        let sigma = detection.value_outlier.sigma_threshold;
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(eyre::eyre!(
                "value_outlier.sigma_threshold must be a non-negative number, got {}",
                sigma
            ));
        }
        let multiplier = detection.gas.price_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(eyre::eyre!(
                "gas.price_multiplier must be a positive number, got {}",
                multiplier
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[anomaly_detection.frequency]
window_secs = 3600
max_transactions = 20

[anomaly_detection.gas]
price_multiplier = 3.5

[api]
port = 8080
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.anomaly_detection.enabled);
        assert_eq!(config.anomaly_detection.frequency.window_secs, 3600);
        assert_eq!(config.anomaly_detection.frequency.max_transactions, 20);
        assert_eq!(config.anomaly_detection.gas.price_multiplier, 3.5);
        assert_eq!(config.anomaly_detection.gas.max_high_gas_transactions, 5); // default
        assert_eq!(config.anomaly_detection.value_outlier.sigma_threshold, 3.0); // default
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0"); // default
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.anomaly_detection, AnomalyDetectionConfig::default());
        assert_eq!(config.anomaly_detection.frequency.window_secs, 86_400);
        assert_eq!(config.anomaly_detection.frequency.max_transactions, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_window() {
        let mut config = Config::default();
        config.anomaly_detection.frequency.window_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_sigma() {
        let mut config = Config::default();
        config.anomaly_detection.value_outlier.sigma_threshold = -1.0;
        assert!(config.validate().is_err());
        config.anomaly_detection.value_outlier.sigma_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_gas_multiplier() {
        let mut config = Config::default();
        config.anomaly_detection.gas.price_multiplier = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[anomaly_detection]\nenabled = false").unwrap();
        let path = file.path().to_str().unwrap();

        let config = Config::load(path).unwrap();
        assert!(!config.anomaly_detection.enabled);
    }

    #[test]
    fn test_load_rejects_invalid_thresholds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[anomaly_detection.gas]\nprice_multiplier = -2.0").unwrap();
        let path = file.path().to_str().unwrap();

        assert!(Config::load(path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/chainwatch-analyzer.toml").unwrap();
        assert!(config.anomaly_detection.enabled);
        assert_eq!(config.api.port, 3000);
    }
}
