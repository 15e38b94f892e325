use serde::{Deserialize, Serialize};

use super::signal::SignalName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    MvrvHigh,
    MvrvLow,
    RsiOverbought,
    RsiOversold,
    MstrOvervalued,
    MstrUndervalued,
    PiCycleProximity,
    SignalActivated(SignalName),
    SignalDeactivated(SignalName),
    DataError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub asset: String,
    pub message: String,
    pub severity: AlertSeverity,
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        asset: &str,
        message: impl Into<String>,
        severity: AlertSeverity,
    ) -> Self {
        Self {
            kind,
            asset: asset.to_string(),
            message: message.into(),
            severity,
        }
    }
}
