//! Registry of every unit the server has reported.

use indexmap::{map::Entry, IndexMap};
use rts_client_core::{TilePos, UnitId, UnitKind, UnitUpdate};

/// Last known record of a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    /// Identifier assigned by the server.
    pub id: UnitId,
    /// Reported unit type.
    pub kind: UnitKind,
    /// Tile the unit occupied when last reported.
    pub pos: TilePos,
    /// Resources carried by a worker or stored by a base; zero when unreported.
    pub resource_carried: u32,
    /// World tick at which the record was last replaced.
    pub last_seen: u64,
}

impl Unit {
    pub(crate) fn from_update(update: &UnitUpdate, tick: u64) -> Self {
        Self {
            id: update.id.clone(),
            kind: update.kind.clone(),
            pos: update.pos(),
            resource_carried: update.resource.unwrap_or(0),
            last_seen: tick,
        }
    }
}

/// Units in first-sighting order; records are replaced in place.
#[derive(Clone, Debug, Default)]
pub(crate) struct UnitRegistry {
    units: IndexMap<UnitId, Unit>,
}

impl UnitRegistry {
    /// Replaces or appends the record for `unit.id`; reports whether the
    /// identifier is new.
    pub(crate) fn upsert(&mut self, unit: Unit) -> bool {
        match self.units.entry(unit.id.clone()) {
            Entry::Occupied(mut slot) => {
                let _ = slot.insert(unit);
                false
            }
            Entry::Vacant(slot) => {
                let _ = slot.insert(unit);
                true
            }
        }
    }

    pub(crate) fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Removes every unit last seen before `oldest_kept`, returning their ids.
    pub(crate) fn remove_older_than(&mut self, oldest_kept: u64) -> Vec<UnitId> {
        let mut removed = Vec::new();
        self.units.retain(|_, unit| {
            if unit.last_seen < oldest_kept {
                removed.push(unit.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}
