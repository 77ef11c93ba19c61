//! Mobile agents roaming the map.

use std::fmt;

use alien_invasion_core::{AlienId, CityName, RandomIndex};
use alien_invasion_world::{query, World};
use thiserror::Error;

/// Reasons an alien operation may fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AlienError {
    /// The alien was destroyed earlier in the run.
    #[error("alien {alien} is already destroyed")]
    AlreadyDestroyed {
        /// Alien destroyed twice.
        alien: AlienId,
    },
    /// The map has no cities to place the alien in.
    #[error("cannot place alien {alien}: the map has no cities")]
    NoKnownCities {
        /// Alien that could not be placed.
        alien: AlienId,
    },
}

/// State of a single alien. The alien refers to its city by name only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alien {
    id: AlienId,
    city: CityName,
    destroyed: bool,
}

impl Alien {
    /// Creates an alien in a city drawn uniformly from the known cities.
    pub fn place_randomly<R>(id: AlienId, world: &World, rng: &mut R) -> Result<Self, AlienError>
    where
        R: RandomIndex + ?Sized,
    {
        let mut known = query::known_cities(world);
        if known.is_empty() {
            return Err(AlienError::NoKnownCities { alien: id });
        }
        let index = rng.index(known.len());
        let city = known.swap_remove(index);
        Ok(Self::at(id, city))
    }

    /// Creates a live alien standing in `city`.
    #[must_use]
    pub fn at(id: AlienId, city: CityName) -> Self {
        Self {
            id,
            city,
            destroyed: false,
        }
    }

    /// Identifier assigned when the alien was created.
    #[must_use]
    pub fn id(&self) -> AlienId {
        self.id
    }

    /// City the alien currently occupies.
    #[must_use]
    pub fn city(&self) -> &CityName {
        &self.city
    }

    /// Is this alien destroyed?
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Destroys the alien. This can happen only once.
    pub fn destroy(&mut self) -> Result<(), AlienError> {
        if self.destroyed {
            return Err(AlienError::AlreadyDestroyed { alien: self.id });
        }
        self.destroyed = true;
        Ok(())
    }

    /// Moves the alien along a random usable road, if one exists.
    ///
    /// Returns whether the alien moved; an alien without usable roads stays
    /// put. Must not be called on a destroyed alien.
    pub fn move_randomly<R>(&mut self, world: &World, rng: &mut R) -> bool
    where
        R: RandomIndex + ?Sized,
    {
        debug_assert!(!self.destroyed, "destroyed aliens never move");
        let mut neighbours = query::connected_cities(world, &self.city);
        if neighbours.is_empty() {
            return false;
        }
        let index = rng.index(neighbours.len());
        self.city = neighbours.swap_remove(index);
        true
    }
}

impl fmt::Display for Alien {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.city)?;
        if self.destroyed {
            f.write_str(" (destroyed)")?;
        }
        Ok(())
    }
}
