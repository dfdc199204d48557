use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{
    get_config_path, get_default_model_path, Config, SimulatorConfig, DEFAULT_CHART_ROWS,
    DEFAULT_MAX_ROWS,
};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep prompting until the input parses as a positive number.
fn prompt_positive<T>(message: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd + Default,
{
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<T>() {
            Ok(v) if v > T::default() => return Ok(v),
            _ => println!("  Invalid: must be a positive number. Try again."),
        }
    }
}

/// Serialize config and write it atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("F1 Predictor Configuration Wizard");
    println!("=================================");
    println!();

    // 1. Model artifact
    println!("The model file is the trained champion classifier exported as JSON.");
    let default_model = get_default_model_path();
    let model_input = prompt_with_default("Model path", &default_model.display().to_string())?;
    let model_path = PathBuf::from(model_input);
    if !model_path.exists() {
        println!(
            "  Note: {} does not exist yet. Predictions will fail until it does.",
            model_path.display()
        );
    }

    // 2. Upload limits
    println!();
    println!("Uploads larger than the row limit are rejected before scoring.");
    let max_rows = prompt_positive("Maximum rows per upload", DEFAULT_MAX_ROWS)?;
    let chart_rows = prompt_positive("Drivers shown in the probability chart", DEFAULT_CHART_ROWS)?;

    // 3. Simulator guardrails
    println!();
    let defaults = SimulatorConfig::default();
    let use_default_sim = prompt_yes_no(
        &format!(
            "Simulator limits - use defaults? (points <= {}, wins <= {}, podiums <= {})",
            defaults.max_points, defaults.max_wins, defaults.max_podiums
        ),
        true,
    )?;
    let simulator = if use_default_sim {
        defaults
    } else {
        SimulatorConfig {
            max_points: prompt_positive("  Maximum points", defaults.max_points)?,
            max_wins: prompt_positive("  Maximum wins", defaults.max_wins)?,
            max_podiums: prompt_positive("  Maximum podiums", defaults.max_podiums)?,
        }
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        model_path: Some(model_path),
        max_rows: Some(max_rows),
        chart_rows: Some(chart_rows),
        simulator: Some(simulator),
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `f1-predictor predict <season.csv>` to get started.");

    Ok(())
}
