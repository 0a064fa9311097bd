#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision engine that turns the world mirror into per-unit commands.
//!
//! Every worker either gathers from the nearest resource, carries its load
//! back to the base, or wanders when it has nowhere to go. Movement toward a
//! target follows the dominant axis and falls back to wall-following when the
//! direct step is blocked. Bases may optionally be asked to build workers.

use rts_client_core::{Command, Direction, Hand, TilePos, UnitKind, CARRY_THRESHOLD};
use rts_client_system_navigation::{NavMemory, NavState, RandomSource, WallFollower};
use rts_client_world::{query, Unit, World};

/// Configuration parameters required to construct the harvest system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    carry_threshold: u32,
    entry_hand: Hand,
    worker_cost: Option<u32>,
}

impl Config {
    /// Creates a configuration with the provided return threshold and
    /// wall-following hand. Worker production starts disabled.
    #[must_use]
    pub const fn new(carry_threshold: u32, entry_hand: Hand) -> Self {
        Self {
            carry_threshold,
            entry_hand,
            worker_cost: None,
        }
    }

    /// Enables worker production for bases holding at least `cost`
    /// resources. A cost of zero disables production.
    #[must_use]
    pub const fn with_worker_cost(mut self, cost: u32) -> Self {
        self.worker_cost = if cost == 0 { None } else { Some(cost) };
        self
    }

    /// Carried amount at which a worker heads back to base.
    #[must_use]
    pub const fn carry_threshold(&self) -> u32 {
        self.carry_threshold
    }

    /// Hand used when a worker starts wall-following.
    #[must_use]
    pub const fn entry_hand(&self) -> Hand {
        self.entry_hand
    }

    /// Base stock required before a worker is ordered.
    #[must_use]
    pub const fn worker_cost(&self) -> Option<u32> {
        self.worker_cost
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(CARRY_THRESHOLD, Hand::Right)
    }
}

/// Pure system that reads the world and emits at most one command per unit.
#[derive(Debug, Default)]
pub struct Harvester {
    config: Config,
    follower: WallFollower,
}

impl Harvester {
    /// Creates a new harvest system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            follower: WallFollower::new(config.entry_hand),
        }
    }

    /// Configuration the system was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Emits this tick's commands in unit registry order.
    ///
    /// Workers receive a navigation record on first consideration. Units that
    /// are neither workers nor producing bases are skipped.
    pub fn handle<R>(
        &self,
        world: &World,
        memory: &mut NavMemory,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        for unit in query::units(world) {
            match unit.kind {
                UnitKind::Worker => {
                    let state = memory.state_for(&unit.id, rng);
                    let (next, command) = self.decide_worker(world, unit, state, rng);
                    memory.store(&unit.id, next);
                    out.extend(command);
                }
                UnitKind::Base => out.extend(self.decide_base(unit)),
                UnitKind::Other(_) => {}
            }
        }
    }

    fn decide_worker<R>(
        &self,
        world: &World,
        unit: &Unit,
        state: NavState,
        rng: &mut R,
    ) -> (NavState, Option<Command>)
    where
        R: RandomSource + ?Sized,
    {
        let target = if unit.resource_carried >= self.config.carry_threshold {
            query::find_base(world).map(|base| (base, Deliver::Deposit))
        } else {
            query::find_closest_resource(world, unit.pos)
                .map(|resource| (resource, Deliver::Gather))
        };

        let is_blocked = |pos: TilePos| query::is_blocked(world, pos);

        let Some((target, deliver)) = target else {
            let (next, chosen) =
                self.follower
                    .resolve_random(state, unit.pos, state.heading(), is_blocked, rng);
            return (next, chosen.map(|dir| move_command(unit, dir)));
        };

        let Some(desired) = direction_toward(unit.pos, target) else {
            return (state, None);
        };

        if is_adjacent(unit.pos, target) {
            return (state, Some(deliver.command(unit, desired)));
        }

        let (next, chosen) = self.follower.resolve(state, unit.pos, desired, is_blocked);
        (next, chosen.map(|dir| move_command(unit, dir)))
    }

    fn decide_base(&self, base: &Unit) -> Option<Command> {
        let cost = self.config.worker_cost?;
        (base.resource_carried >= cost).then(|| Command::Create {
            unit: base.id.clone(),
            kind: UnitKind::Worker,
        })
    }
}

/// Interaction performed once a worker stands next to its target.
#[derive(Clone, Copy, Debug)]
enum Deliver {
    Gather,
    Deposit,
}

impl Deliver {
    fn command(self, unit: &Unit, dir: Direction) -> Command {
        let unit = unit.id.clone();
        match self {
            Self::Gather => Command::Gather { unit, dir },
            Self::Deposit => Command::Deposit { unit, dir },
        }
    }
}

fn move_command(unit: &Unit, dir: Direction) -> Command {
    Command::Move {
        unit: unit.id.clone(),
        dir,
    }
}

/// Direction of the first step from `from` toward `to`.
///
/// The axis with the larger remaining distance wins; vertical wins ties.
/// Returns `None` when both positions coincide.
#[must_use]
pub fn direction_toward(from: TilePos, to: TilePos) -> Option<Direction> {
    let (dx, dy) = from.delta_to(to);
    if dx.abs() > dy.abs() {
        if dx > 0 {
            Some(Direction::East)
        } else {
            Some(Direction::West)
        }
    } else if dy > 0 {
        Some(Direction::South)
    } else if dy < 0 {
        Some(Direction::North)
    } else {
        None
    }
}

/// Reports whether two positions share an edge; diagonals do not count.
#[must_use]
pub fn is_adjacent(a: TilePos, b: TilePos) -> bool {
    a.manhattan_distance(b) == 1
}
