#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map state for the alien invasion simulator.
//!
//! The world owns every city, its outgoing roads and its destroyed flag.
//! Destroying a city only flips the flag: the record and every road touching
//! it are retained, and all read paths in [`query`] filter destroyed cities
//! out.

use std::collections::BTreeMap;

use alien_invasion_core::{CityName, Command, Event, Roads, WorldError};
use tracing::{debug, info};

/// Represents the authoritative city and road graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct World {
    cities: BTreeMap<CityName, Roads>,
    destroyed: BTreeMap<CityName, bool>,
}

impl World {
    /// Creates an empty map without any cities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mark_known(&mut self, city: &CityName) {
        if !self.destroyed.contains_key(city) {
            let _ = self.destroyed.insert(city.clone(), false);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// A rejected command leaves the world untouched and emits no events.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::AddCity { name, roads } => {
            if world.cities.contains_key(&name) {
                return Err(WorldError::DuplicateCity { city: name });
            }

            world.mark_known(&name);
            for destination in roads.destinations() {
                world.mark_known(destination);
            }
            debug!(city = %name, roads = roads.len(), "city added");
            let _ = world.cities.insert(name.clone(), roads);
            out_events.push(Event::CityAdded { city: name });
        }
        Command::DestroyCity { city } => {
            match world.destroyed.get_mut(&city) {
                None => return Err(WorldError::UnknownCity { city }),
                Some(true) => return Err(WorldError::CityAlreadyDestroyed { city }),
                Some(flag) => *flag = true,
            }
            info!(city = %city, "city destroyed");
            out_events.push(Event::CityDestroyed { city });
        }
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{collections::BTreeSet, fmt};

    use super::World;
    use alien_invasion_core::{CityName, Roads};

    /// Every known city: declared ones and those only referenced by a road.
    ///
    /// Each name appears once. Callers must not depend on the ordering.
    #[must_use]
    pub fn known_cities(world: &World) -> Vec<CityName> {
        world.destroyed.keys().cloned().collect()
    }

    /// Cities that were explicitly declared through `Command::AddCity`.
    pub fn declared_cities(world: &World) -> impl Iterator<Item = &CityName> {
        world.cities.keys()
    }

    /// Outgoing roads declared for `city`, including roads into destroyed cities.
    #[must_use]
    pub fn roads<'world>(world: &'world World, city: &CityName) -> Option<&'world Roads> {
        world.cities.get(city)
    }

    /// Reports whether `city` was destroyed. Unknown names are never destroyed.
    #[must_use]
    pub fn is_city_destroyed(world: &World, city: &CityName) -> bool {
        world.destroyed.get(city).copied().unwrap_or(false)
    }

    /// Distinct, non-destroyed cities reachable over a single road from `city`.
    ///
    /// Unknown or destroyed sources have no connections.
    #[must_use]
    pub fn connected_cities(world: &World, city: &CityName) -> Vec<CityName> {
        if is_city_destroyed(world, city) {
            return Vec::new();
        }

        let Some(roads) = world.cities.get(city) else {
            return Vec::new();
        };

        roads
            .destinations()
            .filter(|destination| !is_city_destroyed(world, destination))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Captures a printable listing of the surviving map.
    ///
    /// The listing uses the map-file line format, so it can be parsed back.
    #[must_use]
    pub fn pretty_print(world: &World) -> PrettyMap<'_> {
        PrettyMap { world }
    }

    /// Map-file rendering of every non-destroyed city and its usable roads.
    #[derive(Clone, Copy, Debug)]
    pub struct PrettyMap<'a> {
        world: &'a World,
    }

    impl fmt::Display for PrettyMap<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for (city, destroyed) in &self.world.destroyed {
                if *destroyed {
                    continue;
                }

                f.write_str(city.as_str())?;
                if let Some(roads) = self.world.cities.get(city) {
                    for (direction, destination) in roads.iter() {
                        if is_city_destroyed(self.world, destination) {
                            continue;
                        }
                        write!(f, " {direction}={destination}")?;
                    }
                }
                writeln!(f)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alien_invasion_core::Direction;

    fn city(name: &str) -> CityName {
        CityName::new(name)
    }

    fn roads(entries: &[(Direction, &str)]) -> Roads {
        let mut roads = Roads::new();
        for (direction, destination) in entries {
            roads
                .insert(*direction, city(destination))
                .expect("distinct directions");
        }
        roads
    }

    fn add_city(world: &mut World, name: &str, entries: &[(Direction, &str)]) {
        let mut events = Vec::new();
        apply(
            world,
            Command::AddCity {
                name: city(name),
                roads: roads(entries),
            },
            &mut events,
        )
        .expect("city is added");
    }

    fn destroy(world: &mut World, name: &str) -> Result<(), WorldError> {
        let mut events = Vec::new();
        apply(world, Command::DestroyCity { city: city(name) }, &mut events)
    }

    fn quack_world() -> World {
        let mut world = World::new();
        add_city(
            &mut world,
            "quack",
            &[(Direction::North, "Cha"), (Direction::South, "Blah")],
        );
        world
    }

    #[test]
    fn known_cities_include_road_destinations() {
        let world = quack_world();

        let mut known = query::known_cities(&world);
        known.sort();

        assert_eq!(known, vec![city("Blah"), city("Cha"), city("quack")]);
        let declared: Vec<_> = query::declared_cities(&world).collect();
        assert_eq!(declared, vec![&city("quack")]);
    }

    #[test]
    fn known_cities_are_reported_once() {
        let mut world = quack_world();
        add_city(&mut world, "Cha", &[(Direction::West, "quack")]);
        add_city(&mut world, "Blah", &[(Direction::East, "Cha")]);

        assert_eq!(query::known_cities(&world).len(), 3);
    }

    #[test]
    fn add_city_emits_event() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::AddCity {
                name: city("Foo"),
                roads: Roads::new(),
            },
            &mut events,
        )
        .expect("city is added");

        assert_eq!(events, vec![Event::CityAdded { city: city("Foo") }]);
    }

    #[test]
    fn duplicate_city_is_rejected_without_mutation() {
        let mut world = quack_world();
        let before = world.clone();
        let mut events = Vec::new();

        let result = apply(
            &mut world,
            Command::AddCity {
                name: city("quack"),
                roads: roads(&[(Direction::East, "Elsewhere")]),
            },
            &mut events,
        );

        assert_eq!(
            result,
            Err(WorldError::DuplicateCity {
                city: city("quack")
            })
        );
        assert_eq!(world, before, "rejected city must not touch the map");
        assert!(events.is_empty());
        assert!(!query::known_cities(&world).contains(&city("Elsewhere")));
    }

    #[test]
    fn road_only_city_may_be_declared_later() {
        let mut world = quack_world();
        add_city(&mut world, "Cha", &[(Direction::South, "quack")]);

        assert_eq!(
            query::connected_cities(&world, &city("Cha")),
            vec![city("quack")]
        );
    }

    #[test]
    fn unknown_and_fresh_cities_are_not_destroyed() {
        let world = quack_world();

        assert!(!query::is_city_destroyed(&world, &city("quack")));
        assert!(!query::is_city_destroyed(&world, &city("Cha")));
        assert!(!query::is_city_destroyed(&world, &city("Nowhere")));
    }

    #[test]
    fn destroying_twice_is_rejected() {
        let mut world = quack_world();

        destroy(&mut world, "Cha").expect("first destruction succeeds");
        assert!(query::is_city_destroyed(&world, &city("Cha")));

        assert_eq!(
            destroy(&mut world, "Cha"),
            Err(WorldError::CityAlreadyDestroyed { city: city("Cha") })
        );
    }

    #[test]
    fn destroying_unknown_city_is_rejected() {
        let mut world = quack_world();

        assert_eq!(
            destroy(&mut world, "Nowhere"),
            Err(WorldError::UnknownCity {
                city: city("Nowhere")
            })
        );
    }

    #[test]
    fn destruction_keeps_records_and_roads() {
        let mut world = quack_world();

        destroy(&mut world, "quack").expect("destroyed");

        assert!(query::known_cities(&world).contains(&city("quack")));
        let roads = query::roads(&world, &city("quack")).expect("record retained");
        assert_eq!(roads.len(), 2);
    }

    #[test]
    fn connected_cities_skip_destroyed_destinations() {
        let mut world = quack_world();
        destroy(&mut world, "Cha").expect("destroyed");

        assert_eq!(
            query::connected_cities(&world, &city("quack")),
            vec![city("Blah")]
        );
    }

    #[test]
    fn connected_cities_are_distinct() {
        let mut world = World::new();
        add_city(
            &mut world,
            "Loop",
            &[(Direction::North, "Hub"), (Direction::South, "Hub")],
        );

        assert_eq!(
            query::connected_cities(&world, &city("Loop")),
            vec![city("Hub")]
        );
    }

    #[test]
    fn connected_cities_empty_for_unknown_or_destroyed_source() {
        let mut world = quack_world();

        assert!(query::connected_cities(&world, &city("Nowhere")).is_empty());
        assert!(query::connected_cities(&world, &city("Cha")).is_empty());

        destroy(&mut world, "quack").expect("destroyed");
        assert!(query::connected_cities(&world, &city("quack")).is_empty());
    }

    #[test]
    fn pretty_print_lists_surviving_cities_and_roads() {
        let mut world = quack_world();
        add_city(&mut world, "Cha", &[(Direction::West, "quack")]);
        destroy(&mut world, "Blah").expect("destroyed");

        let rendered = query::pretty_print(&world).to_string();

        assert_eq!(rendered, "Cha west=quack\nquack north=Cha\n");
    }

    #[test]
    fn pretty_print_drops_roads_into_destroyed_cities() {
        let mut world = quack_world();
        add_city(&mut world, "Cha", &[(Direction::West, "quack")]);
        destroy(&mut world, "quack").expect("destroyed");

        let rendered = query::pretty_print(&world).to_string();

        assert_eq!(rendered, "Blah\nCha\n");
    }
}
