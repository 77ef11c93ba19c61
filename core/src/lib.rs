#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the alien invasion simulator.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world map, and the invasion system. Adapters submit
//! [`Command`] values describing desired map mutations, the world executes
//! them via its `apply` entry point and broadcasts [`Event`] values. The
//! invasion system reads the map through immutable queries and draws every
//! random decision from a single [`RandomIndex`] source so that a run is a
//! pure function of the map, its configuration and that source.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique name identifying a city on the map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityName(String);

impl CityName {
    /// Creates a new city name from the provided text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrows the textual form of the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CityName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Compass directions a road may leave a city in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Direction {
    /// Road leading north.
    North,
    /// Road leading east.
    East,
    /// Road leading south.
    South,
    /// Road leading west.
    West,
}

impl Direction {
    /// Every direction in canonical order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Resolves the exact, case-sensitive map-file token for a direction.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "north" => Some(Self::North),
            "east" => Some(Self::East),
            "south" => Some(Self::South),
            "west" => Some(Self::West),
            _ => None,
        }
    }

    /// Map-file token naming the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing roads of a single city, at most one per direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roads {
    by_direction: BTreeMap<Direction, CityName>,
}

impl Roads {
    /// Creates a road table without any roads.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a road leading in `direction` to `destination`.
    ///
    /// A city cannot have two roads leaving in the same direction; the
    /// existing road is kept and the insertion is rejected.
    pub fn insert(
        &mut self,
        direction: Direction,
        destination: CityName,
    ) -> Result<(), DuplicateRoadError> {
        if let Some(existing) = self.by_direction.get(&direction) {
            return Err(DuplicateRoadError {
                direction,
                existing: existing.clone(),
            });
        }
        let _ = self.by_direction.insert(direction, destination);
        Ok(())
    }

    /// Destination of the road leaving in `direction`, if any.
    #[must_use]
    pub fn get(&self, direction: Direction) -> Option<&CityName> {
        self.by_direction.get(&direction)
    }

    /// Iterates roads in canonical direction order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &CityName)> {
        self.by_direction
            .iter()
            .map(|(direction, destination)| (*direction, destination))
    }

    /// Iterates road destinations in canonical direction order.
    pub fn destinations(&self) -> impl Iterator<Item = &CityName> {
        self.by_direction.values()
    }

    /// Number of roads leaving the city.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_direction.len()
    }

    /// Reports whether the city has no roads at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_direction.is_empty()
    }
}

/// Unique identifier assigned to an alien for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlienId(u32);

impl AlienId {
    /// Creates a new alien identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AlienId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commands that express all permissible map mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Declares a new city together with its outgoing roads.
    AddCity {
        /// Name of the declared city.
        name: CityName,
        /// Roads leaving the city.
        roads: Roads,
    },
    /// Marks a known city as destroyed.
    DestroyCity {
        /// City to destroy.
        city: CityName,
    },
}

/// Events broadcast after the map or the aliens change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a city was declared on the map.
    CityAdded {
        /// Name of the declared city.
        city: CityName,
    },
    /// Confirms that a city was flagged as destroyed.
    CityDestroyed {
        /// Name of the destroyed city.
        city: CityName,
    },
    /// Announces that a fight wiped out a city and every alien inside it.
    CityDestroyedByAliens {
        /// City that was destroyed.
        city: CityName,
        /// Aliens destroyed in the fight, in the order they were supplied.
        aliens: Vec<AlienId>,
    },
    /// Confirms that an alien travelled along a road.
    AlienMoved {
        /// Alien that moved.
        alien: AlienId,
        /// City the alien left.
        from: CityName,
        /// City the alien arrived in.
        to: CityName,
    },
    /// Marks the end of a simulated turn.
    TurnCompleted {
        /// Zero-based index of the finished turn.
        turn: u32,
        /// Whether at least one alien moved during the turn.
        moved: bool,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CityAdded { city } => write!(f, "{city} was added to the map"),
            Self::CityDestroyed { city } => write!(f, "{city} was destroyed"),
            Self::CityDestroyedByAliens { city, aliens } => {
                write!(f, "{city} has been destroyed by ")?;
                for (index, alien) in aliens.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "alien {alien}")?;
                }
                f.write_str("!")
            }
            Self::AlienMoved { alien, from, to } => {
                write!(f, "alien {alien} moved from {from} to {to}")
            }
            Self::TurnCompleted { turn, moved } => {
                write!(f, "turn {turn} completed (moved: {moved})")
            }
        }
    }
}

/// Capability that yields uniformly distributed indices.
///
/// Every random decision in a run is funnelled through this trait so a fixed
/// source reproduces the run exactly.
pub trait RandomIndex {
    /// Returns an index in `[0, len)`. Callers never pass `len == 0`.
    fn index(&mut self, len: usize) -> usize;
}

/// Reasons a map mutation may be rejected by the world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A city with the same name was already declared.
    #[error("duplicate city name: {city}")]
    DuplicateCity {
        /// Name that was declared twice.
        city: CityName,
    },
    /// The city was neither declared nor referenced by any road.
    #[error("unknown city: {city}")]
    UnknownCity {
        /// Name that is not on the map.
        city: CityName,
    },
    /// The city was destroyed earlier in the run.
    #[error("city {city} is already destroyed")]
    CityAlreadyDestroyed {
        /// Name of the city destroyed twice.
        city: CityName,
    },
}

/// Raised when a city declares two roads in the same direction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("city already has a road leading {direction} (to {existing})")]
pub struct DuplicateRoadError {
    /// Direction that was declared twice.
    pub direction: Direction,
    /// Destination of the road that was kept.
    pub existing: CityName,
}
