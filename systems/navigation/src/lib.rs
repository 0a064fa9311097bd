#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-unit navigation memory and obstacle resolution.
//!
//! Each unit carries a [`NavState`] across ticks: either a plain heading or a
//! wall-following heading paired with the hand kept against the obstacle. The
//! resolvers on [`WallFollower`] are pure transitions from the previous state,
//! a desired direction and a blocked-tile predicate to the next state and the
//! direction to move, if any.

use std::collections::BTreeMap;

use rand::{seq::SliceRandom, Rng};
use rts_client_core::{Direction, Hand, TilePos, UnitId};

/// Source of the random draws used by navigation.
pub trait RandomSource {
    /// Picks one of the four compass directions uniformly.
    fn pick_direction(&mut self) -> Direction;

    /// Shuffles `directions` uniformly in place.
    fn shuffle_directions(&mut self, directions: &mut [Direction]);
}

impl<R: Rng> RandomSource for R {
    fn pick_direction(&mut self) -> Direction {
        Direction::ALL[self.gen_range(0..Direction::ALL.len())]
    }

    fn shuffle_directions(&mut self, directions: &mut [Direction]) {
        directions.shuffle(self);
    }
}

/// Navigation memory of a single unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    /// Moving freely; the heading is reused when wandering without a target.
    Heading(Direction),
    /// Skirting an obstacle by probing directions in hand order.
    WallFollowing {
        /// Direction chosen by the last successful probe.
        heading: Direction,
        /// Hand kept against the obstacle.
        hand: Hand,
    },
}

impl NavState {
    /// Current heading regardless of mode.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        match self {
            Self::Heading(heading) | Self::WallFollowing { heading, .. } => *heading,
        }
    }

    /// Reports whether the unit is currently wall-following.
    #[must_use]
    pub const fn is_wall_following(&self) -> bool {
        matches!(self, Self::WallFollowing { .. })
    }

    /// Same mode with a different heading.
    #[must_use]
    pub const fn with_heading(self, heading: Direction) -> Self {
        match self {
            Self::Heading(_) => Self::Heading(heading),
            Self::WallFollowing { hand, .. } => Self::WallFollowing { heading, hand },
        }
    }
}

/// Fixed probe order used while wall-following.
///
/// The turn toward `hand` comes first, then straight ahead, then the opposite
/// turn, then reverse.
#[must_use]
pub const fn probe_order(hand: Hand, heading: Direction) -> [Direction; 4] {
    match hand {
        Hand::Right => [
            heading.clockwise(),
            heading,
            heading.counter_clockwise(),
            heading.opposite(),
        ],
        Hand::Left => [
            heading.counter_clockwise(),
            heading,
            heading.clockwise(),
            heading.opposite(),
        ],
    }
}

/// Obstacle resolver used when the direct step toward a goal is blocked.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallFollower {
    entry_hand: Hand,
}

impl WallFollower {
    /// Creates a resolver that keeps the obstacle on `entry_hand` when it
    /// starts wall-following.
    #[must_use]
    pub const fn new(entry_hand: Hand) -> Self {
        Self { entry_hand }
    }

    /// Resolves a step toward `desired` from `pos`.
    ///
    /// A clear step leaves wall-following and keeps the stored heading. A
    /// blocked step enters wall-following (heading `desired`) if not already in
    /// it, then returns the first clear direction in probe order and stores it
    /// as the heading. When every neighbour is blocked the unit stays put and
    /// remains wall-following.
    #[must_use]
    pub fn resolve<F>(
        &self,
        state: NavState,
        pos: TilePos,
        desired: Direction,
        is_blocked: F,
    ) -> (NavState, Option<Direction>)
    where
        F: Fn(TilePos) -> bool,
    {
        if !is_blocked(pos.step(desired)) {
            return (NavState::Heading(state.heading()), Some(desired));
        }

        let (heading, hand) = match state {
            NavState::WallFollowing { heading, hand } => (heading, hand),
            NavState::Heading(_) => (desired, self.entry_hand),
        };

        for direction in probe_order(hand, heading) {
            if !is_blocked(pos.step(direction)) {
                return (
                    NavState::WallFollowing {
                        heading: direction,
                        hand,
                    },
                    Some(direction),
                );
            }
        }

        (NavState::WallFollowing { heading, hand }, None)
    }

    /// Resolves a wandering step that prefers to keep `desired`.
    ///
    /// When `desired` is blocked the other three directions are tried in a
    /// random order and the first clear one becomes the new heading. The
    /// wall-following mode itself is left untouched.
    #[must_use]
    pub fn resolve_random<F, R>(
        &self,
        state: NavState,
        pos: TilePos,
        desired: Direction,
        is_blocked: F,
        rng: &mut R,
    ) -> (NavState, Option<Direction>)
    where
        F: Fn(TilePos) -> bool,
        R: RandomSource + ?Sized,
    {
        if !is_blocked(pos.step(desired)) {
            return (state.with_heading(desired), Some(desired));
        }

        let mut others = [
            desired.clockwise(),
            desired.opposite(),
            desired.counter_clockwise(),
        ];
        rng.shuffle_directions(&mut others);

        match others
            .into_iter()
            .find(|direction| !is_blocked(pos.step(*direction)))
        {
            Some(direction) => (state.with_heading(direction), Some(direction)),
            None => (state, None),
        }
    }
}

/// Navigation state of every unit the engine has considered.
///
/// Records are created lazily with a random heading and kept until explicitly
/// forgotten.
#[derive(Clone, Debug, Default)]
pub struct NavMemory {
    states: BTreeMap<UnitId, NavState>,
}

impl NavMemory {
    /// Creates an empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `unit`, created with a random heading on first use.
    pub fn state_for<R>(&mut self, unit: &UnitId, rng: &mut R) -> NavState
    where
        R: RandomSource + ?Sized,
    {
        if let Some(state) = self.states.get(unit) {
            return *state;
        }

        let state = NavState::Heading(rng.pick_direction());
        let _ = self.states.insert(unit.clone(), state);
        state
    }

    /// Stores the state of `unit` after a resolver transition.
    pub fn store(&mut self, unit: &UnitId, state: NavState) {
        let _ = self.states.insert(unit.clone(), state);
    }

    /// State of `unit`, if it was ever considered.
    #[must_use]
    pub fn get(&self, unit: &UnitId) -> Option<NavState> {
        self.states.get(unit).copied()
    }

    /// Drops the memory of `unit`.
    pub fn forget(&mut self, unit: &UnitId) {
        let _ = self.states.remove(unit);
    }

    /// Number of units with a navigation record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Reports whether no unit has a navigation record yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
