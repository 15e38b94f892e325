//! Threshold alerts attached to a daily evaluation.

use crate::config::SignalThresholds;
use crate::models::alert::{Alert, AlertKind, AlertSeverity};
use crate::models::evaluation::SignalReport;
use crate::models::indicators::{IndicatorReading, PiCycleProximity};
use crate::models::signal::Transition;
use crate::models::valuation::ValuationResult;

pub const MSTR_OVERVALUED_PCT: f64 = 25.0;
pub const MSTR_UNDERVALUED_PCT: f64 = -20.0;

pub fn btc_alerts(reading: &IndicatorReading, thresholds: &SignalThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(mvrv) = reading.mvrv {
        if mvrv > thresholds.sell_mvrv_above {
            alerts.push(Alert::new(
                AlertKind::MvrvHigh,
                "BTC",
                format!("BTC MVRV is high at {:.2} - potential sell signal", mvrv),
                AlertSeverity::Medium,
            ));
        } else if mvrv < thresholds.buy_mvrv_below {
            alerts.push(Alert::new(
                AlertKind::MvrvLow,
                "BTC",
                format!("BTC MVRV is low at {:.2} - potential buy opportunity", mvrv),
                AlertSeverity::Medium,
            ));
        }
    }

    if let Some(rsi) = reading.weekly_rsi {
        if rsi > thresholds.sell_rsi_above {
            alerts.push(Alert::new(
                AlertKind::RsiOverbought,
                "BTC",
                format!("BTC weekly RSI is overbought at {:.1}", rsi),
                AlertSeverity::Medium,
            ));
        } else if rsi < thresholds.buy_rsi_below {
            alerts.push(Alert::new(
                AlertKind::RsiOversold,
                "BTC",
                format!("BTC weekly RSI is oversold at {:.1}", rsi),
                AlertSeverity::Medium,
            ));
        }
    }

    if let Some(pi) = reading.pi_cycle {
        let severity = match pi.proximity() {
            PiCycleProximity::Active => Some(AlertSeverity::High),
            PiCycleProximity::Imminent | PiCycleProximity::VeryClose => {
                Some(AlertSeverity::Medium)
            }
            _ => None,
        };
        if let Some(severity) = severity {
            alerts.push(Alert::new(
                AlertKind::PiCycleProximity,
                "BTC",
                format!(
                    "Pi-Cycle gap at {:.2}% ({:?})",
                    pi.gap_pct,
                    pi.proximity()
                ),
                severity,
            ));
        }
    }

    alerts
}

pub fn mstr_alerts(valuation: &ValuationResult) -> Vec<Alert> {
    let deviation = valuation.deviation_pct;

    if deviation >= MSTR_OVERVALUED_PCT {
        vec![Alert::new(
            AlertKind::MstrOvervalued,
            "MSTR",
            format!(
                "MSTR is {:.1}% overvalued (${:.2} vs ${:.2})",
                deviation, valuation.actual_price, valuation.model_price
            ),
            AlertSeverity::High,
        )]
    } else if deviation <= MSTR_UNDERVALUED_PCT {
        vec![Alert::new(
            AlertKind::MstrUndervalued,
            "MSTR",
            format!(
                "MSTR is {:.1}% undervalued (${:.2} vs ${:.2})",
                deviation.abs(),
                valuation.actual_price,
                valuation.model_price
            ),
            AlertSeverity::Medium,
        )]
    } else {
        Vec::new()
    }
}

/// One alert per activation or deactivation in `reports`.
pub fn transition_alerts(reports: &[SignalReport]) -> Vec<Alert> {
    reports
        .iter()
        .filter_map(|report| {
            let name = report.state.name;
            match report.transition {
                Transition::Activated => Some(Alert::new(
                    AlertKind::SignalActivated(name),
                    "BTC",
                    format!("{} activated", name),
                    AlertSeverity::High,
                )),
                Transition::Deactivated {
                    days_since_condition_met,
                } => Some(Alert::new(
                    AlertKind::SignalDeactivated(name),
                    "BTC",
                    format!(
                        "{} deactivated after {} days without its condition",
                        name, days_since_condition_met
                    ),
                    AlertSeverity::Low,
                )),
                _ => None,
            }
        })
        .collect()
}

pub fn data_error(asset: &str, error: &str) -> Alert {
    Alert::new(
        AlertKind::DataError,
        asset,
        format!("Failed to evaluate {}: {}", asset, error),
        AlertSeverity::High,
    )
}
