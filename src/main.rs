use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use f1_predictor::config::{self, Config};
use f1_predictor::model::{ChampionModel, ModelCache};
use f1_predictor::output;
use f1_predictor::scoring::{self, ScoringPipeline};
use f1_predictor::PipelineError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_MODEL: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a season CSV and show the predicted champion and leaderboard
    Predict {
        /// CSV with columns driver, team, points, wins, podiums
        file: PathBuf,
        /// Drivers shown in the probability chart (defaults to config chart_rows)
        #[arg(long)]
        top: Option<usize>,
        /// Print the leaderboard as tab-separated values only
        #[arg(long)]
        tsv: bool,
    },
    /// Head-to-head comparison of two drivers from a season CSV
    Compare {
        /// CSV with columns driver, team, points, wins, podiums
        file: PathBuf,
        /// First driver (exact match)
        driver_a: String,
        /// Second driver (exact match)
        driver_b: String,
    },
    /// What-if probability for manually entered season stats
    Simulate {
        #[arg(long, default_value_t = 350.0)]
        points: f64,
        #[arg(long, default_value_t = 5)]
        wins: u32,
        #[arg(long, default_value_t = 10)]
        podiums: u32,
    },
    /// Show which statistics the model relies on most
    Insights,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "f1-predictor")]
#[command(about = "F1 championship probability CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/f1-predictor/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the model artifact (overrides config model_path)
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    f1_predictor::logging::init_tracing(cli.verbose);
    let start_time = Instant::now();

    if let Commands::Init = cli.command {
        if let Err(e) = config::init::run_init_wizard(cli.config) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let cache = ModelCache::new(config::resolve_model_path(cli.model, &config));
    let model = match cache.get_or_load() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Model error: {}", e);
            eprintln!(
                "Predictions need a trained model at {}. Set model_path in the config or pass --model.",
                cache.path().display()
            );
            std::process::exit(EXIT_MODEL);
        }
    };
    tracing::debug!(model = model.name(), elapsed = ?start_time.elapsed(), "model ready");

    let code = match run(cli.command, &config, model) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_fatal() {
                EXIT_MODEL
            } else {
                EXIT_INPUT
            }
        }
    };

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(code);
}

fn run(
    command: Commands,
    config: &Config,
    model: Arc<dyn ChampionModel>,
) -> Result<(), PipelineError> {
    let pipeline = ScoringPipeline::new(model);
    let use_colors = output::should_use_colors();

    match command {
        Commands::Predict { file, top, tsv } => {
            let table = scoring::load_table(&file, config.max_rows())?;
            let scored = pipeline.score(&table)?;
            let champion = scoring::pick_champion(&scored)?;
            let ranked = scoring::rank(&scored);

            if tsv {
                println!("{}", output::format_tsv(&ranked));
                return Ok(());
            }

            println!("{}", output::format_champion(champion, use_colors));
            println!();
            println!("PROBABILITY CHART");
            println!(
                "{}",
                output::format_probability_chart(
                    &ranked,
                    top.unwrap_or_else(|| config.chart_rows()),
                    use_colors
                )
            );
            println!();
            println!("FULL LEADERBOARD");
            println!("{}", output::format_leaderboard(&ranked, use_colors));
            println!();
            println!("{}", output::probability_note());
        }
        Commands::Compare {
            file,
            driver_a,
            driver_b,
        } => {
            let table = scoring::load_table(&file, config.max_rows())?;
            let scored = pipeline.score(&table)?;
            let (a, b) = scoring::compare(&scored, &driver_a, &driver_b)?;
            println!("{}", output::format_comparison(a, b, use_colors));
        }
        Commands::Simulate {
            points,
            wins,
            podiums,
        } => {
            if let Err(errors) = config.simulator().check(points, wins, podiums) {
                return Err(PipelineError::InvalidInput(errors.join("; ")));
            }
            let probability = pipeline.simulate(points, wins, podiums)?;
            println!(
                "{}",
                output::format_simulation(points, wins, podiums, probability, use_colors)
            );
        }
        Commands::Insights => match pipeline.insights() {
            Some(importances) => {
                println!("Model: {}", pipeline.model().name());
                println!("{}", output::format_insights(&importances, use_colors));
            }
            None => println!("{}", output::format_insights(&[], use_colors)),
        },
        Commands::Init => unreachable!("init is handled before the model is loaded"),
    }

    Ok(())
}
