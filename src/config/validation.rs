use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(path) = &config.model_path {
        if path.as_os_str().is_empty() {
            errors.push("model_path: must not be empty".to_string());
        }
    }

    if config.max_rows == Some(0) {
        errors.push("max_rows: must be at least 1".to_string());
    }

    if config.chart_rows == Some(0) {
        errors.push("chart_rows: must be at least 1".to_string());
    }

    if let Some(sim) = &config.simulator {
        if !sim.max_points.is_finite() || sim.max_points <= 0.0 {
            errors.push(format!(
                "simulator.max_points: must be a positive number, got {}",
                sim.max_points
            ));
        }
        if sim.max_wins == 0 {
            errors.push("simulator.max_wins: must be at least 1".to_string());
        }
        if sim.max_podiums == 0 {
            errors.push("simulator.max_podiums: must be at least 1".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
