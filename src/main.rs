use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use snake_arena::benchmark::{self, BenchmarkReport};
use snake_arena::config::{DifficultyTable, DEFAULT_CONFIG_PATH};
use snake_arena::error::ConfigError;
use snake_arena::heuristic::{Cautious, Controller, Greedy, Territory};
use snake_arena::visualizer::visualize_game_state;
use snake_arena::world::{World, PRIMARY};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "snake", author, version, about, long_about = None)]
struct Args {
    /// Difficulty presets file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Controller steering the player's snake
    #[arg(long, value_enum, default_value = "territory")]
    player: Strategy,

    /// Controller steering every enemy snake
    #[arg(long, value_enum, default_value = "cautious")]
    enemy: Strategy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game in the terminal
    Run {
        difficulty: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play <n> games headless and report the average score
    Test {
        n: usize,
        /// A difficulty name, or "all"
        difficulty: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// Worker threads (defaults to the number of CPUs)
        #[arg(long)]
        threads: Option<usize>,
        /// Write a JSON report into this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
    /// List the available difficulties
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    Cautious,
    Greedy,
    Territory,
}

impl Strategy {
    fn controller(self) -> Arc<dyn Controller> {
        match self {
            Strategy::Cautious => Arc::new(Cautious),
            Strategy::Greedy => Arc::new(Greedy),
            Strategy::Territory => Arc::new(Territory),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let table = DifficultyTable::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let primary = args.player.controller();
    let enemy = args.enemy.controller();

    match args.command {
        Command::Run { difficulty, seed } => {
            let name = difficulty.unwrap_or_else(|| table.default_difficulty.clone());
            let Some(config) = lookup(&table, &name) else {
                return Ok(());
            };
            let seed = seed.unwrap_or_else(rand::random);
            info!(difficulty = %name, seed, "starting game");

            let mut world = World::new(config, seed)?;
            let frame_delay = Duration::from_secs_f32(1.0 / config.moves_per_second.max(0.1));
            while !world.is_game_over() {
                world.tick(primary.as_ref(), enemy.as_ref());
                let state = world.game_state(PRIMARY);
                println!(
                    "\x1b[2J\x1b[HMove {}/{}  Score {}\n{}",
                    world.moves(),
                    world.max_moves(),
                    state.score,
                    visualize_game_state(&state)
                );
                thread::sleep(frame_delay);
            }
            println!("Final score: {}", world.score());
        }
        Command::Test {
            n,
            difficulty,
            seed,
            threads,
            report_dir,
        } => {
            let name = difficulty.unwrap_or_else(|| table.default_difficulty.clone());
            let threads = threads.unwrap_or_else(num_cpus::get);

            let report = if name == "all" {
                benchmark::run_all(&table, n, seed, threads, primary, enemy)?
            } else {
                let Some(config) = lookup(&table, &name) else {
                    return Ok(());
                };
                let profile =
                    benchmark::run_profile(&name, config, n, seed, threads, primary, enemy)?;
                BenchmarkReport::from_profiles(vec![profile])
            };
            print_report(&report);

            if let Some(dir) = report_dir {
                let path = benchmark::write_report(&report, &dir)?;
                println!("Report written to {}", path.display());
            }
        }
        Command::List => list_modes(&table),
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Prints the known modes instead of failing on an unknown name.
fn lookup<'a>(table: &'a DifficultyTable, name: &str) -> Option<&'a snake_arena::config::GameConfig> {
    match table.get(name) {
        Ok(config) => Some(config),
        Err(ConfigError::UnknownDifficulty { name, .. }) => {
            println!("Unknown difficulty: {}", name);
            list_modes(table);
            None
        }
        Err(_) => None,
    }
}

fn list_modes(table: &DifficultyTable) {
    println!("\nAvailable modes:");
    for (name, config) in &table.difficulties {
        println!(
            "  {:<12} - {}x{} board, {} enemies",
            name, config.width, config.height, config.num_enemies
        );
    }
}

fn print_report(report: &BenchmarkReport) {
    for profile in &report.profiles {
        println!("\n{}:", profile.difficulty);
        println!("  Games: {}", profile.games);
        println!("  Average: {:.1}", profile.mean);
        println!("  Min/Max: {}/{}", profile.min, profile.max);
    }

    if report.profiles.len() > 1 {
        println!("\n{}", "=".repeat(40));
        println!("SUMMARY:");
        let mut ranked: Vec<_> = report.profiles.iter().collect();
        ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        for profile in ranked {
            println!("  {:<12} {:.1}", profile.difficulty, profile.mean);
        }
        println!("\n  Average Score: {:.1}", report.overall_mean);
        println!("{}", "=".repeat(40));
    }
}
