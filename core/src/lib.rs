#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the RTS reference client.
//!
//! This crate defines the message surface that connects the transport adapter,
//! the local world mirror, and the pure decision systems. The adapter decodes a
//! [`GameUpdate`] from every inbound line, the world merges it via its `apply`
//! entry point and broadcasts [`Event`] values describing what changed, and the
//! systems read the world through immutable queries and respond exclusively with
//! [`Command`] batches that the adapter serialises back to the server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Amount of carried resource at which a worker stops gathering and heads home.
pub const CARRY_THRESHOLD: u32 = 10;

/// Cardinal directions understood by the game server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing `y`.
    #[serde(rename = "N")]
    North,
    /// Movement toward increasing `x`.
    #[serde(rename = "E")]
    East,
    /// Movement toward increasing `y`.
    #[serde(rename = "S")]
    South,
    /// Movement toward decreasing `x`.
    #[serde(rename = "W")]
    West,
}

impl Direction {
    /// Every compass direction in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Offset applied to a tile position when stepping once in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction obtained by turning a quarter clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Direction obtained by turning a quarter counter-clockwise.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Single-letter wire code of the direction.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::East => "E",
            Self::South => "S",
            Self::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Hand kept against the obstacle while wall-following.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    /// Keep the obstacle on the left.
    Left,
    /// Keep the obstacle on the right.
    #[default]
    Right,
}

/// Location of a single map tile.
///
/// Coordinates are signed so that positions one step beyond the map edge can
/// be expressed and then rejected by bounds checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    x: i32,
    y: i32,
}

impl TilePos {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Position reached by stepping once in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Signed offset from `self` to `other`.
    #[must_use]
    pub const fn delta_to(self, other: TilePos) -> (i64, i64) {
        (
            other.x as i64 - self.x as i64,
            other.y as i64 - self.y as i64,
        )
    }

    /// Computes the Manhattan distance between two tile positions.
    #[must_use]
    pub fn manhattan_distance(self, other: TilePos) -> u64 {
        let (dx, dy) = self.delta_to(other);
        dx.unsigned_abs() + dy.unsigned_abs()
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Server-assigned unit identifier, echoed back in the form it was received.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl From<i64> for UnitId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for UnitId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Unit type reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitKind {
    /// Gathers resources and carries them home.
    Worker,
    /// Drop-off point for gathered resources.
    Base,
    /// Any other unit type; ignored by the decision engine.
    Other(String),
}

impl UnitKind {
    /// Wire name of the unit type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Worker => "worker",
            Self::Base => "base",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for UnitKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "worker" => Self::Worker,
            "base" => Self::Base,
            _ => Self::Other(value),
        }
    }
}

impl From<UnitKind> for String {
    fn from(value: UnitKind) -> Self {
        match value {
            UnitKind::Worker => "worker".to_owned(),
            UnitKind::Base => "base".to_owned(),
            UnitKind::Other(name) => name,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded inbound message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameUpdate {
    /// Map description; only required on the first message of a session.
    #[serde(default)]
    pub game_info: Option<GameInfo>,
    /// Tiles whose state changed since the previous message.
    #[serde(default)]
    pub tile_updates: Vec<TileUpdate>,
    /// Units whose state changed since the previous message.
    #[serde(default)]
    pub unit_updates: Vec<UnitUpdate>,
}

/// Map description sent at the start of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    /// Number of tile columns.
    pub map_width: u32,
    /// Number of tile rows.
    pub map_height: u32,
}

/// Reported state of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileUpdate {
    /// Column of the tile.
    pub x: i32,
    /// Row of the tile.
    pub y: i32,
    /// Whether the tile is impassable; absent leaves the last known value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    /// Resource amount on the tile; absent means depleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<u32>,
}

impl TileUpdate {
    /// Position named by the update.
    #[must_use]
    pub const fn pos(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }
}

/// Reported state of a single unit; replaces any previous record wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitUpdate {
    /// Identifier assigned by the server.
    pub id: UnitId,
    /// Unit type.
    #[serde(rename = "type")]
    pub kind: UnitKind,
    /// Column of the unit.
    pub x: i32,
    /// Row of the unit.
    pub y: i32,
    /// Resources carried (workers) or stored (bases).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<u32>,
}

impl UnitUpdate {
    /// Position named by the update.
    #[must_use]
    pub const fn pos(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }
}

/// Commands the client may issue for a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "UPPERCASE")]
pub enum Command {
    /// Step one tile.
    Move {
        /// Unit receiving the order.
        unit: UnitId,
        /// Direction of the step.
        dir: Direction,
    },
    /// Harvest from the adjacent resource tile.
    Gather {
        /// Unit receiving the order.
        unit: UnitId,
        /// Direction of the resource tile.
        dir: Direction,
    },
    /// Hand carried resources to the adjacent base.
    Deposit {
        /// Unit receiving the order.
        unit: UnitId,
        /// Direction of the base.
        dir: Direction,
    },
    /// Drop part of the carried resources onto an adjacent tile.
    Drop {
        /// Unit receiving the order.
        unit: UnitId,
        /// Direction of the receiving tile.
        dir: Direction,
        /// Amount dropped.
        value: u32,
    },
    /// Ask a base to build a new unit.
    Create {
        /// Base receiving the order.
        unit: UnitId,
        /// Type of unit to build.
        #[serde(rename = "type")]
        kind: UnitKind,
    },
}

impl Command {
    /// Unit addressed by the command.
    #[must_use]
    pub fn unit(&self) -> &UnitId {
        match self {
            Self::Move { unit, .. }
            | Self::Gather { unit, .. }
            | Self::Deposit { unit, .. }
            | Self::Drop { unit, .. }
            | Self::Create { unit, .. } => unit,
        }
    }
}

/// Outbound message carrying every command issued during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBatch {
    /// Commands in emission order.
    pub commands: Vec<Command>,
}

impl From<Vec<Command>> for CommandBatch {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

/// Events broadcast by the world after merging an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The tile grid was created for the session.
    GridInitialized {
        /// Number of tile columns.
        width: u32,
        /// Number of tile rows.
        height: u32,
    },
    /// A tile started reporting resources.
    ResourceDiscovered {
        /// Location of the resource.
        pos: TilePos,
        /// Reported amount.
        amount: u32,
    },
    /// A known resource tile reported a different amount.
    ResourceChanged {
        /// Location of the resource.
        pos: TilePos,
        /// Newly reported amount.
        amount: u32,
    },
    /// A resource tile stopped reporting resources.
    ResourceDepleted {
        /// Location of the former resource.
        pos: TilePos,
    },
    /// A unit identifier was seen for the first time.
    UnitSighted {
        /// Identifier of the unit.
        unit: UnitId,
        /// Reported unit type.
        kind: UnitKind,
    },
    /// A unit was dropped from the registry after going unreported.
    UnitExpired {
        /// Identifier of the unit.
        unit: UnitId,
    },
    /// A tile update named a position outside the map and was discarded.
    TileIgnored {
        /// Position named by the update.
        pos: TilePos,
    },
}
