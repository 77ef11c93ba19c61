#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a map and runs the alien invasion.

mod driver;

use std::path::PathBuf;

use alien_invasion_system_invasion::Config;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_TIME: u32 = 10_000;

/// Run the alien simulator.
#[derive(Debug, Parser)]
#[command(name = "alien-invasion", version)]
struct Cli {
    /// Turn info logging on.
    #[arg(long, global = true)]
    info_logging: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the simulator.
    Run {
        #[command(flatten)]
        map: MapArgs,

        /// Number of aliens.
        num_aliens: u32,

        /// Maximum number of turns.
        #[arg(default_value_t = DEFAULT_MAX_TIME)]
        max_time: u32,

        /// Seed for the random source (default: drawn from the OS).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Verify the map file.
    Verify {
        #[command(flatten)]
        map: MapArgs,
    },
}

/// Location of the map shared by every command.
#[derive(Debug, Args)]
struct MapArgs {
    /// Location of map config file.
    #[arg(long = "map", value_name = "PATH")]
    path: PathBuf,
}

/// Entry point for the alien invasion command-line interface.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.info_logging);

    match cli.command {
        Commands::Run {
            map,
            num_aliens,
            max_time,
            seed,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            driver::run(&map.path, Config::new(num_aliens, max_time), seed)
        }
        Commands::Verify { map } => driver::verify(&map.path),
    }
}

fn init_logging(info_logging: bool) {
    let default_level = if info_logging { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults_max_time() {
        let cli = Cli::try_parse_from(["alien-invasion", "run", "--map", "map.txt", "4"])
            .expect("arguments parse");

        match cli.command {
            Commands::Run {
                map,
                num_aliens,
                max_time,
                seed,
            } => {
                assert_eq!(map.path, PathBuf::from("map.txt"));
                assert_eq!(num_aliens, 4);
                assert_eq!(max_time, DEFAULT_MAX_TIME);
                assert_eq!(seed, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(!cli.info_logging);
    }

    #[test]
    fn run_accepts_turn_limit_seed_and_logging() {
        let cli = Cli::try_parse_from([
            "alien-invasion",
            "run",
            "7",
            "25",
            "--map",
            "world.map",
            "--seed",
            "99",
            "--info-logging",
        ])
        .expect("arguments parse");

        assert!(cli.info_logging);
        match cli.command {
            Commands::Run {
                num_aliens,
                max_time,
                seed,
                ..
            } => {
                assert_eq!(num_aliens, 7);
                assert_eq!(max_time, 25);
                assert_eq!(seed, Some(99));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verify_requires_map() {
        assert!(Cli::try_parse_from(["alien-invasion", "verify"]).is_err());

        let cli = Cli::try_parse_from(["alien-invasion", "verify", "--map", "m.txt"])
            .expect("arguments parse");
        assert!(matches!(cli.command, Commands::Verify { .. }));
    }

    #[test]
    fn run_requires_alien_count() {
        assert!(Cli::try_parse_from(["alien-invasion", "run", "--map", "m.txt"]).is_err());
        assert!(Cli::try_parse_from(["alien-invasion", "run", "--map", "m.txt", "many"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
