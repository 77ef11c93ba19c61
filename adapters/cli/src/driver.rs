//! Drives the `run` and `verify` commands against a loaded map.

use std::{
    fmt,
    io::{self, Write},
    path::Path,
};

use alien_invasion_core::Event;
use alien_invasion_map_file as map_file;
use alien_invasion_system_invasion::{Alien, Config, Invasion, SeededRandom};
use alien_invasion_world::{query, World};
use anyhow::{Context, Result};
use tracing::info;

/// Loads the map and reports whether it is well formed.
pub(crate) fn verify(map_path: &Path) -> Result<()> {
    let _ = load_map(map_path)?;
    info!(path = %map_path.display(), "map verified");
    Ok(())
}

/// Runs the invasion to completion, announcing fights and the final map on stdout.
pub(crate) fn run(map_path: &Path, config: Config, seed: u64) -> Result<()> {
    let mut world = load_map(map_path)?;
    info!(
        seed,
        aliens = config.alien_count(),
        max_turns = config.max_turns(),
        "starting invasion"
    );

    let mut rng = SeededRandom::new(seed);
    let mut invasion = Invasion::new(config, &world, &mut rng).context("failed to land aliens")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    simulate(&mut world, &mut invasion, &mut rng, &mut out)?;

    let summary = invasion.summary();
    info!(
        turns = summary.turns_played,
        survivors = summary.surviving_aliens,
        "invasion over"
    );
    Ok(())
}

fn load_map(map_path: &Path) -> Result<World> {
    map_file::load(map_path).with_context(|| format!("failed to load map {}", map_path.display()))
}

fn simulate<W: Write>(
    world: &mut World,
    invasion: &mut Invasion,
    rng: &mut SeededRandom,
    out: &mut W,
) -> Result<()> {
    let mut events = Vec::new();
    while !invasion.is_finished() {
        let turn = invasion.turns_played();
        info!(turn, "map before turn:\n{}", query::pretty_print(world));
        info!(turn, "aliens before turn:\n{}", AlienRoster(invasion.aliens()));

        let _ = invasion.step(world, rng, &mut events)?;
        announce(out, &events)?;
        events.clear();
    }

    writeln!(out, "==== Final map")?;
    write!(out, "{}", query::pretty_print(world))?;
    out.flush()?;
    Ok(())
}

fn announce<W: Write>(out: &mut W, events: &[Event]) -> io::Result<()> {
    for event in events {
        if let Event::CityDestroyedByAliens { .. } = event {
            writeln!(out, "{event}")?;
        }
    }
    Ok(())
}

/// Surviving aliens, one per line.
struct AlienRoster<'a>(&'a [Alien]);

impl fmt::Display for AlienRoster<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for alien in self.0.iter().filter(|alien| !alien.is_destroyed()) {
            writeln!(f, "{alien}")?;
        }
        Ok(())
    }
}
