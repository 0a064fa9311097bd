//! Dense tile storage backing the world mirror.

use rts_client_core::{TilePos, TileUpdate};

/// Last known state of a single map tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    observed: bool,
    blocked: bool,
    resources: Option<u32>,
}

impl Tile {
    /// Reports whether the server has described this tile at least once.
    #[must_use]
    pub const fn is_observed(&self) -> bool {
        self.observed
    }

    /// Reports whether the tile was last described as impassable.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Positive resource amount on the tile, if any.
    #[must_use]
    pub const fn resources(&self) -> Option<u32> {
        self.resources
    }

    /// Merges an update into the tile and returns the previous resource amount.
    pub(crate) fn merge(&mut self, update: &TileUpdate) -> Option<u32> {
        self.observed = true;
        if let Some(blocked) = update.blocked {
            self.blocked = blocked;
        }
        let previous = self.resources;
        self.resources = update.resources.filter(|amount| *amount > 0);
        previous
    }
}

/// Row-major grid holding one [`Tile`] per coordinate inside the map bounds.
#[derive(Clone, Debug)]
pub(crate) struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// `tile_count` must equal `width * height`.
    pub(crate) fn new(width: u32, height: u32, tile_count: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); tile_count],
        }
    }

    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn get(&self, pos: TilePos) -> Option<&Tile> {
        self.index(pos).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn get_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        self.index(pos).and_then(|index| self.tiles.get_mut(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (TilePos, &Tile)> {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().filter_map(move |(index, tile)| {
            let index = u32::try_from(index).ok()?;
            let x = i32::try_from(index % width).ok()?;
            let y = i32::try_from(index / width).ok()?;
            Some((TilePos::new(x, y), tile))
        })
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        let x = u32::try_from(pos.x()).ok()?;
        let y = u32::try_from(pos.y()).ok()?;
        if x < self.width && y < self.height {
            let row = usize::try_from(y).ok()?;
            let column = usize::try_from(x).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
