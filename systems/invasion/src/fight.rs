//! Fight resolution between aliens sharing a city.

use alien_invasion_core::{AlienId, CityName, Command, Event, WorldError};
use alien_invasion_world::{apply, World};
use thiserror::Error;
use tracing::info;

use crate::alien::{Alien, AlienError};

/// Reasons a fight may fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FightError {
    /// Fewer than two aliens were supplied.
    #[error("a fight in {city} requires at least two aliens, got {count}")]
    InsufficientParticipants {
        /// City the fight was requested for.
        city: CityName,
        /// Number of aliens supplied.
        count: usize,
    },
    /// A participant stands in a different city than the fight.
    #[error("alien {alien} is in {found}, not in {city}")]
    LocationMismatch {
        /// City the fight was requested for.
        city: CityName,
        /// Participant standing elsewhere.
        alien: AlienId,
        /// City the participant actually occupies.
        found: CityName,
    },
    /// The world rejected the destruction of the city.
    #[error(transparent)]
    World(#[from] WorldError),
    /// A participant could not be destroyed.
    #[error(transparent)]
    Alien(#[from] AlienError),
}

/// Destroys `city` together with every participating alien, all at once.
///
/// Every participant is validated before anything is mutated, so a rejected
/// fight leaves the world and the aliens untouched. On success the
/// announcement is pushed as [`Event::CityDestroyedByAliens`], naming the
/// aliens in the order they were supplied.
pub fn fight(
    world: &mut World,
    city: &CityName,
    participants: &mut [&mut Alien],
    out_events: &mut Vec<Event>,
) -> Result<(), FightError> {
    if participants.len() < 2 {
        return Err(FightError::InsufficientParticipants {
            city: city.clone(),
            count: participants.len(),
        });
    }

    for alien in participants.iter() {
        if alien.city() != city {
            return Err(FightError::LocationMismatch {
                city: city.clone(),
                alien: alien.id(),
                found: alien.city().clone(),
            });
        }
        if alien.is_destroyed() {
            return Err(AlienError::AlreadyDestroyed { alien: alien.id() }.into());
        }
    }

    apply(
        world,
        Command::DestroyCity { city: city.clone() },
        out_events,
    )?;

    let mut destroyed = Vec::with_capacity(participants.len());
    for alien in participants.iter_mut() {
        alien.destroy()?;
        destroyed.push(alien.id());
    }

    info!(city = %city, aliens = ?destroyed, "aliens fought");
    out_events.push(Event::CityDestroyedByAliens {
        city: city.clone(),
        aliens: destroyed,
    });
    Ok(())
}
