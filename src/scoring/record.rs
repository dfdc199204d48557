use serde::{Deserialize, Serialize};

/// One driver's season line as uploaded or entered in the simulator.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DriverSeasonRecord {
    pub driver: String,
    pub team: String,
    pub points: f64,
    pub wins: u32,
    pub podiums: u32,
}

impl DriverSeasonRecord {
    pub fn new(driver: &str, team: &str, points: f64, wins: u32, podiums: u32) -> Self {
        Self {
            driver: driver.to_string(),
            team: team.to_string(),
            points,
            wins,
            podiums,
        }
    }

    /// Points must be finite and non-negative. Podiums below wins is allowed.
    pub fn check(&self) -> Result<(), String> {
        if !self.points.is_finite() {
            return Err(format!("points must be a number, got {}", self.points));
        }
        if self.points < 0.0 {
            return Err(format!("points must be non-negative, got {}", self.points));
        }
        Ok(())
    }

    /// Feature vector in training order: points, wins, podiums.
    pub fn features(&self) -> Vec<f64> {
        vec![self.points, self.wins as f64, self.podiums as f64]
    }
}

/// A record with its championship probability attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: DriverSeasonRecord,
    /// Unrounded P(champion), used for every comparison
    pub win_probability: f64,
    /// Percentage rounded to 2 decimals, display only
    pub win_percentage: f64,
}

impl ScoredRecord {
    pub fn new(record: DriverSeasonRecord, win_probability: f64) -> Self {
        Self {
            record,
            win_probability,
            win_percentage: to_display_percentage(win_probability),
        }
    }

    pub fn driver(&self) -> &str {
        &self.record.driver
    }
}

/// Probability as a percentage rounded half-to-even at 2 decimals.
pub fn to_display_percentage(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round_ties_even() / 100.0
}
