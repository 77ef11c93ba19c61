#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic invasion system that places aliens, resolves fights and
//! moves survivors turn by turn.
//!
//! Each turn runs in strict phases: surviving aliens are grouped by city,
//! every city holding two or more aliens is destroyed together with them,
//! then every survivor attempts a move. All fights of a turn observe the
//! same pre-turn snapshot of alien locations. The run ends after the
//! configured number of turns, or earlier once a turn passes without any
//! alien moving.

mod alien;
mod fight;
mod random;

use std::collections::BTreeMap;

use alien_invasion_core::{AlienId, CityName, Event, RandomIndex};
use alien_invasion_world::World;
use thiserror::Error;
use tracing::{debug, info};

pub use alien::{Alien, AlienError};
pub use fight::{fight, FightError};
pub use random::SeededRandom;

/// Configuration parameters required to construct the invasion system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    alien_count: u32,
    max_turns: u32,
}

impl Config {
    /// Creates a configuration landing `alien_count` aliens for at most `max_turns` turns.
    #[must_use]
    pub const fn new(alien_count: u32, max_turns: u32) -> Self {
        Self {
            alien_count,
            max_turns,
        }
    }

    /// Number of aliens placed at the start of the run.
    #[must_use]
    pub const fn alien_count(&self) -> u32 {
        self.alien_count
    }

    /// Upper bound on the number of simulated turns.
    #[must_use]
    pub const fn max_turns(&self) -> u32 {
        self.max_turns
    }
}

/// Fatal failures that end a run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// An alien could not be placed on the map.
    #[error("failed to place alien {alien}")]
    Placement {
        /// Alien that could not be placed.
        alien: AlienId,
        /// Underlying placement failure.
        #[source]
        source: AlienError,
    },
    /// A fight violated a map or alien invariant.
    #[error("fight in {city} during turn {turn} failed")]
    Fight {
        /// Zero-based turn the fight happened in.
        turn: u32,
        /// City the fight happened in.
        city: CityName,
        /// Underlying fight failure.
        #[source]
        source: FightError,
    },
}

/// Result of a single simulated turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Zero-based index of the turn.
    pub turn: u32,
    /// Number of cities destroyed by fights during the turn.
    pub fights: usize,
    /// Whether at least one alien moved.
    pub moved: bool,
}

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of turns that were simulated.
    pub turns_played: u32,
    /// Whether the run stopped before the turn limit because nothing moved.
    pub terminated_early: bool,
    /// Aliens still alive at the end of the run.
    pub surviving_aliens: usize,
}

/// Invasion system owning the alien roster of a run.
#[derive(Clone, Debug)]
pub struct Invasion {
    aliens: Vec<Alien>,
    max_turns: u32,
    turns_played: u32,
    terminated_early: bool,
}

impl Invasion {
    /// Lands `config.alien_count()` aliens, numbered from 1, in random known cities.
    pub fn new<R>(config: Config, world: &World, rng: &mut R) -> Result<Self, SimulationError>
    where
        R: RandomIndex + ?Sized,
    {
        let mut aliens = Vec::with_capacity(config.alien_count as usize);
        for number in 1..=config.alien_count {
            let id = AlienId::new(number);
            let alien = Alien::place_randomly(id, world, rng)
                .map_err(|source| SimulationError::Placement { alien: id, source })?;
            debug!(alien = %id, city = %alien.city(), "alien landed");
            aliens.push(alien);
        }

        Ok(Self::with_aliens(aliens, config.max_turns))
    }

    /// Creates a run over an existing roster.
    #[must_use]
    pub fn with_aliens(aliens: Vec<Alien>, max_turns: u32) -> Self {
        Self {
            aliens,
            max_turns,
            turns_played: 0,
            terminated_early: false,
        }
    }

    /// Every alien of the run, destroyed ones included, in creation order.
    #[must_use]
    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    /// Number of turns simulated so far.
    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// Reports whether no further turns will be simulated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.terminated_early || self.turns_played >= self.max_turns
    }

    /// Summarises the run as it stands.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            turns_played: self.turns_played,
            terminated_early: self.terminated_early,
            surviving_aliens: self
                .aliens
                .iter()
                .filter(|alien| !alien.is_destroyed())
                .count(),
        }
    }

    /// Simulates the next turn, or returns `None` once the run is finished.
    pub fn step<R>(
        &mut self,
        world: &mut World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<Option<TurnOutcome>, SimulationError>
    where
        R: RandomIndex + ?Sized,
    {
        if self.is_finished() {
            return Ok(None);
        }

        let turn = self.turns_played;
        let fights = self.resolve_fights(turn, world, out_events)?;
        let moved = self.move_survivors(world, rng, out_events);

        self.turns_played += 1;
        out_events.push(Event::TurnCompleted { turn, moved });
        if !moved {
            self.terminated_early = true;
            info!(turn, "no alien moved, ending the invasion");
        }

        Ok(Some(TurnOutcome { turn, fights, moved }))
    }

    /// Simulates turns until the run is finished.
    pub fn run<R>(
        &mut self,
        world: &mut World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<RunSummary, SimulationError>
    where
        R: RandomIndex + ?Sized,
    {
        while self.step(world, rng, out_events)?.is_some() {}
        let summary = self.summary();
        info!(
            turns = summary.turns_played,
            survivors = summary.surviving_aliens,
            terminated_early = summary.terminated_early,
            "invasion finished"
        );
        Ok(summary)
    }

    fn resolve_fights(
        &mut self,
        turn: u32,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) -> Result<usize, SimulationError> {
        let mut occupancy: BTreeMap<&CityName, usize> = BTreeMap::new();
        for alien in self.aliens.iter().filter(|alien| !alien.is_destroyed()) {
            *occupancy.entry(alien.city()).or_default() += 1;
        }
        let contested: Vec<CityName> = occupancy
            .into_iter()
            .filter(|(_, count)| *count >= 2)
            .map(|(city, _)| city.clone())
            .collect();

        for city in &contested {
            let mut participants: Vec<&mut Alien> = self
                .aliens
                .iter_mut()
                .filter(|alien| !alien.is_destroyed() && alien.city() == city)
                .collect();
            fight(world, city, &mut participants, out_events).map_err(|source| {
                SimulationError::Fight {
                    turn,
                    city: city.clone(),
                    source,
                }
            })?;
        }

        Ok(contested.len())
    }

    fn move_survivors<R>(
        &mut self,
        world: &World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> bool
    where
        R: RandomIndex + ?Sized,
    {
        let mut moved = false;
        for alien in self.aliens.iter_mut().filter(|alien| !alien.is_destroyed()) {
            let from = alien.city().clone();
            if alien.move_randomly(world, rng) {
                moved = true;
                debug!(alien = %alien.id(), from = %from, to = %alien.city(), "alien moved");
                out_events.push(Event::AlienMoved {
                    alien: alien.id(),
                    from,
                    to: alien.city().clone(),
                });
            }
        }
        moved
    }
}
