//! Insertion-ordered index of tiles currently reporting resources.

use indexmap::IndexMap;
use rts_client_core::TilePos;

/// Mapping from tile position to resource amount.
///
/// Entries keep the order in which they were first recorded; updating the
/// amount of a known entry does not move it. Nearest-resource ties resolve to
/// the earliest entry, so the ordering is observable.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResourceIndex {
    entries: IndexMap<TilePos, u32>,
}

impl ResourceIndex {
    /// Records `amount` at `pos`, returning the previously recorded amount.
    pub(crate) fn insert(&mut self, pos: TilePos, amount: u32) -> Option<u32> {
        self.entries.insert(pos, amount)
    }

    /// Forgets `pos`, returning the amount it held.
    pub(crate) fn remove(&mut self, pos: TilePos) -> Option<u32> {
        self.entries.shift_remove(&pos)
    }

    pub(crate) fn get(&self, pos: TilePos) -> Option<u32> {
        self.entries.get(&pos).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (TilePos, u32)> + '_ {
        self.entries.iter().map(|(pos, amount)| (*pos, *amount))
    }

    /// Entry with the smallest Manhattan distance to `from`; the first such
    /// entry wins ties.
    pub(crate) fn closest_to(&self, from: TilePos) -> Option<TilePos> {
        let mut best: Option<(TilePos, u64)> = None;
        for (pos, _) in self.iter() {
            let distance = from.manhattan_distance(pos);
            if best.map_or(true, |(_, current)| distance < current) {
                best = Some((pos, distance));
            }
        }
        best.map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updating_amount_keeps_position() {
        let mut index = ResourceIndex::default();
        assert_eq!(index.insert(TilePos::new(4, 0), 10), None);
        assert_eq!(index.insert(TilePos::new(0, 4), 20), None);
        assert_eq!(index.insert(TilePos::new(4, 0), 7), Some(10));

        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec![(TilePos::new(4, 0), 7), (TilePos::new(0, 4), 20)]);
    }

    #[test]
    fn reinserted_entry_moves_to_the_back() {
        let mut index = ResourceIndex::default();
        let _ = index.insert(TilePos::new(1, 0), 5);
        let _ = index.insert(TilePos::new(0, 1), 5);
        assert_eq!(index.remove(TilePos::new(1, 0)), Some(5));
        let _ = index.insert(TilePos::new(1, 0), 5);

        assert_eq!(index.closest_to(TilePos::new(0, 0)), Some(TilePos::new(0, 1)));
    }

    #[test]
    fn removing_an_entry_keeps_the_rest_in_order() {
        let mut index = ResourceIndex::default();
        for x in 0..5 {
            let _ = index.insert(TilePos::new(x, 0), 1);
        }
        assert_eq!(index.remove(TilePos::new(1, 0)), Some(1));
        assert_eq!(index.remove(TilePos::new(1, 0)), None);

        let order: Vec<_> = index.iter().map(|(pos, _)| pos.x()).collect();
        assert_eq!(order, vec![0, 2, 3, 4]);
        assert_eq!(index.get(TilePos::new(3, 0)), Some(1));
    }

    #[test]
    fn closest_prefers_first_recorded_on_ties() {
        let mut index = ResourceIndex::default();
        let _ = index.insert(TilePos::new(3, 0), 1);
        let _ = index.insert(TilePos::new(0, 3), 1);
        let _ = index.insert(TilePos::new(9, 9), 1);

        assert_eq!(index.closest_to(TilePos::new(0, 0)), Some(TilePos::new(3, 0)));
    }

    #[test]
    fn closest_on_empty_index_is_none() {
        let index = ResourceIndex::default();
        assert_eq!(index.closest_to(TilePos::new(0, 0)), None);
        assert_eq!(index.len(), 0);
    }
}
