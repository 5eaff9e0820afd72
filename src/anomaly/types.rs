use serde::{Deserialize, Serialize};

/// Types of anomalies the engine can detect, in the order the engine reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    HighFrequency,
    UnusualValues,
    GasAnomaly,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighFrequency => "high_frequency",
            Self::UnusualValues => "unusual_values",
            Self::GasAnomaly => "gas_anomaly",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::HighFrequency => "Unusually high number of transactions in the last 24 hours",
            Self::UnusualValues => "Detected transactions with unusually high or low values",
            Self::GasAnomaly => "Multiple transactions with unusually high gas prices",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::HighFrequency => Severity::High,
            Self::UnusualValues | Self::GasAnomaly => Severity::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One reported anomaly. Description and severity are fixed per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub description: String,
    pub severity: Severity,
}

impl From<AnomalyType> for Finding {
    fn from(anomaly_type: AnomalyType) -> Self {
        Self {
            anomaly_type,
            description: anomaly_type.description().to_string(),
            severity: anomaly_type.severity(),
        }
    }
}
