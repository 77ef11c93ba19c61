#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loader for the line-oriented map file format.
//!
//! Each non-empty line declares one city followed by its roads:
//!
//! ```text
//! Foo north=Bar west=Baz south=Qu-ux   # trailing comments are ignored
//! ```
//!
//! Fields are separated by a single space. Cities that only appear as road
//! destinations become known, road-less cities.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use alien_invasion_core::{
    CityName, Command, Direction, DuplicateRoadError, Event, Roads, WorldError,
};
use alien_invasion_world::{apply, query, World};
use thiserror::Error;
use tracing::{debug, info};

const COMMENT_MARKER: char = '#';
const FIELD_DELIMITER: char = ' ';
const ROAD_DELIMITER: char = '=';

/// Errors that can occur while loading a map file.
#[derive(Debug, Error)]
pub enum MapFileError {
    /// The map could not be read.
    #[error("could not read map")]
    Io(#[from] io::Error),
    /// The map contents were malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A malformed line, tagged with its 1-based line number.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based number of the offending line.
    pub line: usize,
    /// What was wrong with the line.
    pub kind: ParseErrorKind,
}

/// Reasons a single map line may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A city name was empty or contained a reserved character.
    #[error("invalid city name '{token}'")]
    InvalidCityToken {
        /// Offending token.
        token: String,
    },
    /// A road field lacked the `direction=city` separator.
    #[error("malformed road '{token}', expected direction=city")]
    MalformedRoad {
        /// Offending token.
        token: String,
    },
    /// A road used something other than north, east, south or west.
    #[error("invalid direction '{token}'")]
    InvalidDirection {
        /// Offending token.
        token: String,
    },
    /// The city declared two roads leaving in the same direction.
    #[error(transparent)]
    DuplicateRoad(#[from] DuplicateRoadError),
    /// The world rejected the declared city.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Reads and parses the map stored at `path`.
pub fn load(path: &Path) -> Result<World, MapFileError> {
    let file = File::open(path)?;
    let world = parse(BufReader::new(file))?;
    info!(
        path = %path.display(),
        cities = query::known_cities(&world).len(),
        "map loaded"
    );
    Ok(world)
}

/// Parses a map from any buffered reader.
pub fn parse<R: BufRead>(reader: R) -> Result<World, MapFileError> {
    let mut world = World::new();
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        add_line(&mut world, index + 1, &line, &mut events)?;
    }
    Ok(world)
}

/// Parses a map held in memory.
pub fn parse_str(input: &str) -> Result<World, ParseError> {
    let mut world = World::new();
    let mut events = Vec::new();
    for (index, line) in input.lines().enumerate() {
        add_line(&mut world, index + 1, line, &mut events)?;
    }
    Ok(world)
}

fn add_line(
    world: &mut World,
    line_number: usize,
    line: &str,
    events: &mut Vec<Event>,
) -> Result<(), ParseError> {
    let wrap = |kind: ParseErrorKind| ParseError {
        line: line_number,
        kind,
    };

    let Some((name, roads)) = parse_line(line).map_err(wrap)? else {
        return Ok(());
    };
    debug!(line = line_number, city = %name, roads = roads.len(), "parsed city");
    apply(world, Command::AddCity { name, roads }, events)
        .map_err(|error| wrap(error.into()))
}

/// Parses one line, yielding `None` for blank or comment-only lines.
fn parse_line(line: &str) -> Result<Option<(CityName, Roads)>, ParseErrorKind> {
    let content = line
        .split(COMMENT_MARKER)
        .next()
        .unwrap_or_default()
        .trim();
    if content.is_empty() {
        return Ok(None);
    }

    let mut fields = content.split(FIELD_DELIMITER);
    let name = city_name(fields.next().unwrap_or_default())?;

    let mut roads = Roads::new();
    for field in fields {
        let (direction, destination) =
            field
                .split_once(ROAD_DELIMITER)
                .ok_or_else(|| ParseErrorKind::MalformedRoad {
                    token: field.to_owned(),
                })?;
        let direction =
            Direction::from_token(direction).ok_or_else(|| ParseErrorKind::InvalidDirection {
                token: direction.to_owned(),
            })?;
        roads.insert(direction, city_name(destination)?)?;
    }

    Ok(Some((name, roads)))
}

fn city_name(token: &str) -> Result<CityName, ParseErrorKind> {
    let reserved = |c: char| c == ROAD_DELIMITER || c == COMMENT_MARKER || c.is_whitespace();
    if token.is_empty() || token.contains(reserved) {
        return Err(ParseErrorKind::InvalidCityToken {
            token: token.to_owned(),
        });
    }
    Ok(CityName::new(token))
}
