//! Number Sort Solver - CLI
//!
//! Solve, compare, analyze and generate Number Sort levels, or play one with
//! a live solver watching every move.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use number_sort_solver::{
    commands::{
        GenerateConfig, analyze_level, compare_levels, generate_levels, list_levels, resolve,
        solve_puzzle,
    },
    live::LiveConfig,
    output::{
        print_analysis_result, print_comparison, print_generate_result, print_levels,
        print_solve_result,
    },
    solver::{SearchMode, SolveOptions},
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "number_sort_solver",
    about = "Optimal solver and level generator for the Number Sort tube-merge puzzle",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search mode: astar (default) or bfs
    #[arg(short, long, global = true, default_value = "astar")]
    mode: String,

    /// Expansion budget (defaults depend on the mode)
    #[arg(long, global = true)]
    max_states: Option<usize>,

    /// Wall-clock budget in milliseconds (0 disables it)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a level in the terminal with live solver feedback (default)
    Play {
        /// Level number, JSON file or compact puzzle
        #[arg(default_value = "1")]
        level: String,
    },

    /// Solve levels and print the optimal path
    Solve {
        /// Level number, range, `all`, JSON file or compact puzzle
        level: String,

        /// Show the board after every move and search statistics
        #[arg(short = 'd', long)]
        detail: bool,
    },

    /// Solve levels with BFS and A* and compare the results
    Compare {
        /// Level number, range, `all`, JSON file or compact puzzle
        #[arg(default_value = "all")]
        level: String,
    },

    /// Validate levels and report their structure and difficulty
    Analyze {
        /// Level number, range, `all`, JSON file or compact puzzle
        level: String,
    },

    /// Generate new levels
    Generate {
        /// Levels per group
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Only generate this group (Medium, Hard, Hard-Expert, Expert)
        #[arg(short, long)]
        group: Option<String>,

        /// JSON file with custom group definitions
        #[arg(long)]
        groups: Option<PathBuf>,

        /// Attempts per level
        #[arg(long)]
        max_attempts: Option<usize>,

        /// Random seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Write accepted levels to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the embedded levels
    List,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn solve_options(cli: &Cli) -> Result<SolveOptions> {
    let Some(mode) = SearchMode::from_name(&cli.mode) else {
        bail!("unknown search mode '{}', expected astar or bfs", cli.mode);
    };

    let mut options = SolveOptions::for_mode(mode);
    if let Some(max_states) = cli.max_states {
        options = options.with_max_states(max_states);
    }
    if let Some(ms) = cli.timeout_ms {
        options = options.with_timeout((ms > 0).then(|| Duration::from_millis(ms)));
    }
    Ok(options)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = solve_options(&cli)?;

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play {
        level: "1".to_string(),
    });

    // The TUI owns the terminal, so it runs without a log subscriber
    if !matches!(command, Commands::Play { .. }) {
        init_logging(cli.verbose);
    }

    match command {
        Commands::Play { level } => run_play_command(&level, options.mode, cli.max_states),
        Commands::Solve { level, detail } => {
            for named in resolve(&level)? {
                let puzzle = named.puzzle()?;
                let report = solve_puzzle(&named.label, &puzzle, &options);
                print_solve_result(&report, detail);
            }
            Ok(())
        }
        Commands::Compare { level } => {
            let levels = resolve(&level)?;
            let summary = compare_levels(&levels, &options)?;
            print_comparison(&summary);
            Ok(())
        }
        Commands::Analyze { level } => {
            for named in resolve(&level)? {
                print_analysis_result(&analyze_level(&named, &options));
            }
            Ok(())
        }
        Commands::Generate {
            count,
            group,
            groups,
            max_attempts,
            seed,
            output,
        } => {
            let config = GenerateConfig {
                groups_file: groups,
                group,
                levels_per_group: count,
                max_attempts,
                seed,
                output,
            };
            print_generate_result(&generate_levels(&config)?);
            Ok(())
        }
        Commands::List => {
            print_levels(&list_levels());
            Ok(())
        }
    }
}

fn run_play_command(level: &str, mode: SearchMode, max_states: Option<usize>) -> Result<()> {
    use number_sort_solver::interactive::{App, run_tui};

    let Some(named) = resolve(level)?.into_iter().next() else {
        bail!("no level found for '{level}'");
    };
    let puzzle = named.puzzle()?;

    let mut config = LiveConfig::default().with_mode(mode);
    if let Some(max_states) = max_states {
        config = config.with_max_states(max_states);
    }

    let app = App::new(named.label, puzzle, config, Instant::now());
    run_tui(app)
}
