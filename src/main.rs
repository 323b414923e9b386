use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nomogram::config::Config;
use nomogram::source::{load_with_fallback, EmbeddedSource, LoadedModel, ModelSource, WorkbookSource};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_SELECTION: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate total points and survival estimates (default if no subcommand)
    Score {
        /// Select an option for a variable, e.g. --select "pTNM=Stage II".
        /// Variables without a selection use their first option.
        #[arg(short, long = "select", value_name = "KEY=VALUE", value_parser = parse_selection)]
        selections: Vec<(String, String)>,

        /// Print the result as JSON (missing estimates become null)
        #[arg(long, conflicts_with = "tsv")]
        json: bool,

        /// Print the result as tab-separated values
        #[arg(long)]
        tsv: bool,
    },
    /// List variables, their options and point ranges
    Variables,
    /// Show the survival reference table
    Table,
}

#[derive(Parser, Debug)]
#[command(name = "nomogram")]
#[command(about = "Nomogram survival calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/nomogram/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Workbook file with variable sheets and the survival table (.json, .yaml)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Name of the survival table sheet
    #[arg(long, global = true)]
    survival_sheet: Option<String>,

    /// Fail instead of using the embedded data when the workbook can't be loaded
    #[arg(long, global = true)]
    no_fallback: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_selection(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_model(config: &Config) -> anyhow::Result<LoadedModel> {
    let embedded = EmbeddedSource;
    let Some(path) = config.data_path() else {
        return load_with_fallback(&embedded, None);
    };

    let workbook = WorkbookSource::new(path).with_survival_sheet(config.survival_sheet());
    let fallback: Option<&dyn ModelSource> = if config.fallback_to_embedded() {
        Some(&embedded)
    } else {
        None
    };
    load_with_fallback(&workbook, fallback)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Score {
        selections: Vec::new(),
        json: false,
        tsv: false,
    });

    // Load config, then let flags override it
    let config_path = cli.config.map(PathBuf::from);
    let mut config = match nomogram::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(data) = cli.data {
        config.data = Some(data);
    }
    if let Some(sheet) = cli.survival_sheet {
        config.survival_sheet = Some(sheet);
    }
    if cli.no_fallback {
        config.fallback_to_embedded = Some(false);
    }

    if let Err(errors) = nomogram::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let loaded = match load_model(&config) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to load nomogram data: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };
    let model = loaded.model;
    log::info!(
        "Using {} ({} variables, {} survival rows)",
        loaded.origin,
        model.variables().len(),
        model.survival_table().len()
    );

    let use_colors = nomogram::output::should_use_colors();
    let decimals = config.percent_decimals();

    match command {
        Commands::Score {
            selections,
            json,
            tsv,
        } => {
            let mut state = nomogram::scoring::SelectionState::new();
            for (key, value) in &selections {
                if let Err(e) = state.select(&model, key, value) {
                    eprintln!("Selection error: {}", e);
                    std::process::exit(EXIT_SELECTION);
                }
            }

            let result = nomogram::scoring::calculate_score(&model, &state);
            log::debug!("{}", nomogram::output::format_debug_line(&result));

            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Failed to serialize result: {}", e);
                        std::process::exit(EXIT_DATA);
                    }
                }
            } else if tsv {
                println!("{}", nomogram::output::format_tsv(&result));
            } else {
                println!(
                    "{}",
                    nomogram::output::format_score_report(
                        &result,
                        model.total_points_range(),
                        decimals,
                        use_colors
                    )
                );
            }
        }
        Commands::Variables => {
            println!("{}", nomogram::output::format_variables(&model, use_colors));
        }
        Commands::Table => {
            println!(
                "{}",
                nomogram::output::format_survival_table(&model, decimals, use_colors)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
