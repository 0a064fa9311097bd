#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Local mirror of the server-reported world state.
//!
//! The world is mutated exclusively through [`apply`] (or its two halves,
//! [`apply_tile_updates`] and [`apply_unit_updates`]) and read through the
//! functions in [`query`]. Every mutation reports what changed as
//! [`Event`] values so adapters can log without inspecting internals.

mod resources;
mod tiles;
mod units;

use rts_client_core::{Event, GameUpdate, TileUpdate, UnitUpdate};
use thiserror::Error;

use crate::{resources::ResourceIndex, tiles::TileGrid, units::UnitRegistry};

pub use crate::{tiles::Tile, units::Unit};

/// Largest number of tiles a map may declare (4096 x 4096).
pub const MAX_TILES: u64 = 1 << 24;

/// Errors raised when updates arrive out of sequence.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The tile grid was already created for this session.
    #[error("tile grid already initialised as {width}x{height}")]
    AlreadyInitialized {
        /// Width of the existing grid.
        width: u32,
        /// Height of the existing grid.
        height: u32,
    },
    /// An update arrived before any map description.
    #[error("update received before the map size was known")]
    NotInitialized,
    /// The server declared an empty map or one larger than [`MAX_TILES`].
    #[error(
        "map dimensions {width}x{height} are empty or exceed {} tiles",
        MAX_TILES
    )]
    InvalidDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
}

/// Authoritative local snapshot of tiles, resources and units.
#[derive(Debug, Default)]
pub struct World {
    grid: Option<TileGrid>,
    resources: ResourceIndex,
    units: UnitRegistry,
    tick: u64,
}

impl World {
    /// Creates an empty world awaiting its map description.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the `width` x `height` tile grid with every tile unknown.
    ///
    /// Both dimensions must be positive and their product at most
    /// [`MAX_TILES`].
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<(), WorldError> {
        if let Some(grid) = &self.grid {
            let (width, height) = grid.dimensions();
            return Err(WorldError::AlreadyInitialized { width, height });
        }

        let tile_count = u64::from(width)
            .checked_mul(u64::from(height))
            .filter(|count| (1..=MAX_TILES).contains(count))
            .and_then(|count| usize::try_from(count).ok())
            .ok_or(WorldError::InvalidDimensions { width, height })?;

        self.grid = Some(TileGrid::new(width, height, tile_count));
        Ok(())
    }

    /// Removes units that have not been reported during the last `max_age`
    /// ticks.
    pub fn prune_stale(&mut self, max_age: u64, out_events: &mut Vec<Event>) {
        let oldest_kept = self.tick.saturating_sub(max_age);
        for unit in self.units.remove_older_than(oldest_kept) {
            out_events.push(Event::UnitExpired { unit });
        }
    }
}

/// Merges one decoded server message into the world.
///
/// The first message carrying `game_info` creates the grid; later map
/// descriptions are ignored. Tile updates are merged before unit updates and
/// the world tick advances once per call.
pub fn apply(
    world: &mut World,
    update: &GameUpdate,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    if world.grid.is_none() {
        let info = update.game_info.ok_or(WorldError::NotInitialized)?;
        world.initialize(info.map_width, info.map_height)?;
        out_events.push(Event::GridInitialized {
            width: info.map_width,
            height: info.map_height,
        });
    }

    world.tick = world.tick.saturating_add(1);
    apply_tile_updates(world, &update.tile_updates, out_events);
    apply_unit_updates(world, &update.unit_updates, out_events);
    Ok(())
}

/// Merges tile updates, keeping the resource index in sync with the tiles.
///
/// Updates naming positions outside the grid are discarded.
pub fn apply_tile_updates(
    world: &mut World,
    updates: &[TileUpdate],
    out_events: &mut Vec<Event>,
) {
    for update in updates {
        let pos = update.pos();
        let Some(tile) = world.grid.as_mut().and_then(|grid| grid.get_mut(pos)) else {
            out_events.push(Event::TileIgnored { pos });
            continue;
        };

        let previous = tile.merge(update);
        match (previous, tile.resources()) {
            (None, Some(amount)) => {
                let _ = world.resources.insert(pos, amount);
                out_events.push(Event::ResourceDiscovered { pos, amount });
            }
            (Some(before), Some(amount)) => {
                let _ = world.resources.insert(pos, amount);
                if before != amount {
                    out_events.push(Event::ResourceChanged { pos, amount });
                }
            }
            (Some(_), None) => {
                let _ = world.resources.remove(pos);
                out_events.push(Event::ResourceDepleted { pos });
            }
            (None, None) => {}
        }
    }
}

/// Replaces the registry record of every named unit.
pub fn apply_unit_updates(
    world: &mut World,
    updates: &[UnitUpdate],
    out_events: &mut Vec<Event>,
) {
    for update in updates {
        if world.units.upsert(Unit::from_update(update, world.tick)) {
            out_events.push(Event::UnitSighted {
                unit: update.id.clone(),
                kind: update.kind.clone(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rts_client_core::{TilePos, UnitId, UnitKind};

    use super::{Tile, Unit, World};

    /// Grid dimensions, once the map size is known.
    #[must_use]
    pub fn dimensions(world: &World) -> Option<(u32, u32)> {
        world.grid.as_ref().map(|grid| grid.dimensions())
    }

    /// Number of updates merged so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Tile at `pos`, or `None` when it lies outside the grid or was never
    /// described by the server.
    #[must_use]
    pub fn tile_at(world: &World, pos: TilePos) -> Option<&Tile> {
        world
            .grid
            .as_ref()
            .and_then(|grid| grid.get(pos))
            .filter(|tile| tile.is_observed())
    }

    /// Reports whether a unit may not step onto `pos`.
    ///
    /// Unknown and off-map tiles count as blocked.
    #[must_use]
    pub fn is_blocked(world: &World, pos: TilePos) -> bool {
        tile_at(world, pos).map_or(true, Tile::is_blocked)
    }

    /// Every tile inside the grid, observed or not, in row-major order.
    pub fn tiles(world: &World) -> impl Iterator<Item = (TilePos, &Tile)> {
        world.grid.iter().flat_map(|grid| grid.iter())
    }

    /// Known resource tiles and their amounts, in first-discovery order.
    pub fn resources(world: &World) -> impl Iterator<Item = (TilePos, u32)> + '_ {
        world.resources.iter()
    }

    /// Number of tiles currently reporting resources.
    #[must_use]
    pub fn resource_count(world: &World) -> usize {
        world.resources.len()
    }

    /// Resource amount recorded at `pos`.
    #[must_use]
    pub fn resource_at(world: &World, pos: TilePos) -> Option<u32> {
        world.resources.get(pos)
    }

    /// Resource tile nearest to `from` by Manhattan distance; the earliest
    /// discovered tile wins ties.
    #[must_use]
    pub fn find_closest_resource(world: &World, from: TilePos) -> Option<TilePos> {
        world.resources.closest_to(from)
    }

    /// Position of the first base in registry order.
    #[must_use]
    pub fn find_base(world: &World) -> Option<TilePos> {
        units(world)
            .find(|unit| unit.kind == UnitKind::Base)
            .map(|unit| unit.pos)
    }

    /// Every registered unit in first-sighting order.
    pub fn units(world: &World) -> impl Iterator<Item = &Unit> {
        world.units.iter()
    }

    /// Registered units of type worker, in first-sighting order.
    pub fn workers(world: &World) -> impl Iterator<Item = &Unit> {
        units(world).filter(|unit| unit.kind == UnitKind::Worker)
    }

    /// Record of the unit with the given identifier.
    #[must_use]
    pub fn unit<'world>(world: &'world World, id: &UnitId) -> Option<&'world Unit> {
        world.units.get(id)
    }
}
