use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAX_ROWS: usize = 1000;
pub const DEFAULT_CHART_ROWS: usize = 10;

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// model_path: /opt/models/f1_champion_predictor.json
/// max_rows: 500
/// chart_rows: 10
/// simulator:
///   max_points: 600
///   max_wins: 25
///   max_podiums: 25
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the model artifact (default: ~/.config/f1-predictor/f1_champion_predictor.json)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Largest upload accepted, in data rows (default: 1000)
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Bars shown in the probability chart (default: 10)
    #[serde(default)]
    pub chart_rows: Option<usize>,

    /// Input guardrails for the simulator
    #[serde(default)]
    pub simulator: Option<SimulatorConfig>,
}

impl Config {
    pub fn max_rows(&self) -> usize {
        self.max_rows.unwrap_or(DEFAULT_MAX_ROWS)
    }

    pub fn chart_rows(&self) -> usize {
        self.chart_rows.unwrap_or(DEFAULT_CHART_ROWS)
    }

    pub fn simulator(&self) -> SimulatorConfig {
        self.simulator.clone().unwrap_or_default()
    }
}

/// Simulator input bounds. These only guard manual input; the pipeline itself
/// accepts any non-negative value.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    pub max_points: f64,
    pub max_wins: u32,
    pub max_podiums: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_points: 600.0,
            max_wins: 25,
            max_podiums: 25,
        }
    }
}

impl SimulatorConfig {
    /// Check manual simulator input against the bounds.
    /// Returns one message per out-of-range value.
    pub fn check(&self, points: f64, wins: u32, podiums: u32) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if !(0.0..=self.max_points).contains(&points) {
            errors.push(format!(
                "points must be between 0 and {}, got {}",
                self.max_points, points
            ));
        }
        if wins > self.max_wins {
            errors.push(format!(
                "wins must be between 0 and {}, got {}",
                self.max_wins, wins
            ));
        }
        if podiums > self.max_podiums {
            errors.push(format!(
                "podiums must be between 0 and {}, got {}",
                self.max_podiums, podiums
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
