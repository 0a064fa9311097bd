use std::{
    cell::Cell,
    collections::{HashSet, VecDeque},
};

use rts_client_core::{Direction, Hand, TilePos};
use rts_client_system_navigation::{NavState, RandomSource, WallFollower};

/// Random source replaying a fixed script of draws.
#[derive(Default)]
struct ScriptedRandom {
    headings: VecDeque<Direction>,
    shuffles: VecDeque<Vec<Direction>>,
    shuffle_calls: usize,
}

impl RandomSource for ScriptedRandom {
    fn pick_direction(&mut self) -> Direction {
        self.headings.pop_front().unwrap_or(Direction::North)
    }

    fn shuffle_directions(&mut self, directions: &mut [Direction]) {
        self.shuffle_calls += 1;
        if let Some(order) = self.shuffles.pop_front() {
            directions.copy_from_slice(&order);
        }
    }
}

fn walls(cells: &[(i32, i32)]) -> impl Fn(TilePos) -> bool {
    let blocked: HashSet<TilePos> = cells.iter().map(|&(x, y)| TilePos::new(x, y)).collect();
    move |pos| blocked.contains(&pos)
}

#[test]
fn clear_step_is_taken_and_leaves_wall_following() {
    let follower = WallFollower::default();
    let state = NavState::WallFollowing {
        heading: Direction::West,
        hand: Hand::Right,
    };

    let (next, chosen) = follower.resolve(state, TilePos::new(2, 2), Direction::North, walls(&[]));

    assert_eq!(chosen, Some(Direction::North));
    assert_eq!(next, NavState::Heading(Direction::West));
}

#[test]
fn blocked_step_enters_right_hand_wall_following() {
    let follower = WallFollower::default();
    let state = NavState::Heading(Direction::South);

    let (next, chosen) = follower.resolve(
        state,
        TilePos::new(2, 2),
        Direction::North,
        walls(&[(2, 1)]),
    );

    assert_eq!(chosen, Some(Direction::East));
    assert_eq!(
        next,
        NavState::WallFollowing {
            heading: Direction::East,
            hand: Hand::Right
        }
    );
}

#[test]
fn entry_hand_is_configurable() {
    let follower = WallFollower::new(Hand::Left);

    let (next, chosen) = follower.resolve(
        NavState::Heading(Direction::North),
        TilePos::new(2, 2),
        Direction::North,
        walls(&[(2, 1)]),
    );

    assert_eq!(chosen, Some(Direction::West));
    assert_eq!(
        next,
        NavState::WallFollowing {
            heading: Direction::West,
            hand: Hand::Left
        }
    );
}

#[test]
fn ongoing_wall_following_probes_from_stored_heading() {
    let follower = WallFollower::default();
    let state = NavState::WallFollowing {
        heading: Direction::East,
        hand: Hand::Right,
    };

    // Desired north is blocked; probing starts from east: [S, E, N, W].
    let (next, chosen) = follower.resolve(
        state,
        TilePos::new(2, 2),
        Direction::North,
        walls(&[(2, 1), (2, 3)]),
    );

    assert_eq!(chosen, Some(Direction::East));
    assert_eq!(next.heading(), Direction::East);
    assert!(next.is_wall_following());
}

#[test]
fn boxed_in_unit_stays_put_and_keeps_wall_following() {
    let follower = WallFollower::default();
    let boxed = walls(&[(1, 0), (2, 1), (1, 2), (0, 1)]);

    let (next, chosen) = follower.resolve(
        NavState::Heading(Direction::East),
        TilePos::new(1, 1),
        Direction::South,
        boxed,
    );

    assert_eq!(chosen, None);
    assert_eq!(
        next,
        NavState::WallFollowing {
            heading: Direction::South,
            hand: Hand::Right
        }
    );
}

#[test]
fn wall_following_walks_around_a_bar() {
    // A horizontal bar at y = 2 spanning x = 1..=3 sits between the unit and
    // its goal directly north.
    let follower = WallFollower::default();
    let blocked = walls(&[(1, 2), (2, 2), (3, 2)]);
    let goal = TilePos::new(2, 0);
    let mut pos = TilePos::new(2, 3);
    let mut state = NavState::Heading(Direction::South);

    for _ in 0..12 {
        if pos == goal {
            break;
        }
        let (dx, dy) = pos.delta_to(goal);
        let desired = if dx.abs() > dy.abs() {
            if dx > 0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0 {
            Direction::South
        } else {
            Direction::North
        };
        let (next, chosen) = follower.resolve(state, pos, desired, &blocked);
        state = next;
        let direction = chosen.expect("open field always offers a step");
        let target = pos.step(direction);
        assert!(!blocked(target), "stepped into a wall at {target}");
        pos = target;
    }

    assert_eq!(pos, goal);
}

#[test]
fn random_walk_keeps_clear_heading_without_drawing() {
    let follower = WallFollower::default();
    let mut rng = ScriptedRandom::default();

    let (next, chosen) = follower.resolve_random(
        NavState::Heading(Direction::West),
        TilePos::new(3, 3),
        Direction::West,
        walls(&[]),
        &mut rng,
    );

    assert_eq!(chosen, Some(Direction::West));
    assert_eq!(next, NavState::Heading(Direction::West));
    assert_eq!(rng.shuffle_calls, 0);
}

#[test]
fn random_walk_takes_first_clear_shuffled_direction() {
    let follower = WallFollower::default();
    let mut rng = ScriptedRandom {
        shuffles: VecDeque::from([vec![Direction::South, Direction::East, Direction::West]]),
        ..ScriptedRandom::default()
    };

    let (next, chosen) = follower.resolve_random(
        NavState::Heading(Direction::North),
        TilePos::new(1, 1),
        Direction::North,
        walls(&[(1, 0), (1, 2)]),
        &mut rng,
    );

    assert_eq!(chosen, Some(Direction::East));
    assert_eq!(next, NavState::Heading(Direction::East));
    assert_eq!(rng.shuffle_calls, 1);
}

#[test]
fn random_walk_gives_up_when_surrounded() {
    let follower = WallFollower::default();
    let mut rng = ScriptedRandom::default();
    let probes = Cell::new(0);

    let (next, chosen) = follower.resolve_random(
        NavState::WallFollowing {
            heading: Direction::East,
            hand: Hand::Right,
        },
        TilePos::new(1, 1),
        Direction::East,
        |_| {
            probes.set(probes.get() + 1);
            true
        },
        &mut rng,
    );

    assert_eq!(chosen, None);
    assert_eq!(
        next,
        NavState::WallFollowing {
            heading: Direction::East,
            hand: Hand::Right
        }
    );
    assert_eq!(probes.get(), 4);
}
