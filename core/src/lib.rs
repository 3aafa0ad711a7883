#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the FiveTwelve engine.
//!
//! This crate defines the message surface that connects the controller, the
//! authoritative board, and the views. Controllers submit [`Command`] values
//! describing desired mutations, the board executes them, and every change is
//! broadcast as an [`Event`] to the listeners a view registered. Events carry
//! owned snapshots of the affected entity so views never borrow model state.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Side length of the default square board.
pub const GRID_SIZE: usize = 4;

/// Two-axis integer offset used both as a grid position and as a step.
///
/// Interpreted as a position, a vector is the distance from the upper-left
/// cell. Interpreted as movement, it is the distance from another position,
/// so adding a direction offset to a position yields the neighbouring cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    row: i32,
    column: i32,
}

impl Vector {
    /// Creates a vector from row and column components.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Row component (first axis).
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Column component (second axis).
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Component-wise sum, or `None` when either axis overflows.
    #[must_use]
    pub const fn checked_add(self, other: Vector) -> Option<Vector> {
        match (
            self.row.checked_add(other.row),
            self.column.checked_add(other.column),
        ) {
            (Some(row), Some(column)) => Some(Vector::new(row, column)),
            _ => None,
        }
    }
}

/// Plain `i32` addition; overflow follows the build's arithmetic checks. Use
/// [`Vector::checked_add`] for offsets that come from callers.
impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.row + other.row, self.column + other.column)
    }
}

/// Directions a sweep can push tiles toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row zero.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column zero.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    /// Every direction, in the order controllers usually probe them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Single-cell step taken by a tile sliding in this direction.
    #[must_use]
    pub const fn offset(self) -> Vector {
        match self {
            Self::Up => Vector::new(-1, 0),
            Self::Down => Vector::new(1, 0),
            Self::Left => Vector::new(0, -1),
            Self::Right => Vector::new(0, 1),
        }
    }
}

/// Unique identifier assigned to a tile by its board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle returned when a listener is registered with an observable element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u32);

impl ListenerId {
    /// Creates a new listener handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Commands that express all permissible board mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Slides every tile toward one edge of the board.
    Sweep {
        /// Edge the tiles are pushed toward.
        direction: Direction,
    },
    /// Places a new tile on a randomly chosen empty cell.
    Place {
        /// Explicit tile value; `None` draws 2 or 4 at random.
        value: Option<u32>,
    },
}

/// Kind of change an [`Event`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A tile appeared on the board.
    TileCreated,
    /// A tile changed position or value.
    TileUpdated,
    /// A tile was absorbed by a merge and left the board.
    TileRemoved,
    /// A directional sweep finished.
    SweepCompleted,
    /// The board contents were replaced wholesale.
    BoardReset,
}

/// Notification broadcast to listeners after a model mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Snapshot of the entity it happened to.
    pub entity: Entity,
}

impl Event {
    /// Creates an event about a tile.
    #[must_use]
    pub const fn tile(kind: EventKind, snapshot: TileSnapshot) -> Self {
        Self {
            kind,
            entity: Entity::Tile(snapshot),
        }
    }

    /// Creates an event about the board as a whole.
    #[must_use]
    pub const fn board(kind: EventKind, summary: BoardSummary) -> Self {
        Self {
            kind,
            entity: Entity::Board(summary),
        }
    }
}

/// Entity affected by an [`Event`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    /// A single tile.
    Tile(TileSnapshot),
    /// The board.
    Board(BoardSummary),
}

/// Immutable representation of a single tile used for notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// Identifier allocated to the tile by the board.
    pub id: TileId,
    /// Cell the tile occupies.
    pub position: Vector,
    /// Face value of the tile.
    pub value: u32,
}

/// Aggregate board state attached to board-level events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Number of rows in the grid.
    pub rows: usize,
    /// Number of columns in the grid.
    pub columns: usize,
    /// Sum of all tile values.
    pub score: u64,
    /// Number of occupied cells.
    pub tiles: usize,
}

#[cfg(test)]
mod tests {
    use super::{
        BoardSummary, Command, Direction, Event, EventKind, TileId, TileSnapshot, Vector,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn vectors_add_component_wise() {
        let position = Vector::new(2, 3);
        let step = Vector::new(-1, 1);
        assert_eq!(position + step, Vector::new(1, 4));
    }

    #[test]
    fn checked_add_reports_overflow_on_either_axis() {
        let position = Vector::new(1, 1);
        assert_eq!(
            position.checked_add(Vector::new(2, -3)),
            Some(Vector::new(3, -2))
        );
        assert_eq!(position.checked_add(Vector::new(i32::MAX, 0)), None);
        assert_eq!(position.checked_add(Vector::new(0, i32::MAX)), None);
        assert_eq!(Vector::new(-1, 0).checked_add(Vector::new(i32::MIN, 0)), None);
    }

    #[test]
    fn vector_equality_compares_both_axes() {
        assert_eq!(Vector::new(1, 2), Vector::new(1, 2));
        assert_ne!(Vector::new(1, 2), Vector::new(2, 1));
    }

    #[test]
    fn direction_offsets_point_toward_their_edge() {
        assert_eq!(Direction::Right.offset(), Vector::new(0, 1));
        assert_eq!(Direction::Left.offset(), Vector::new(0, -1));
        assert_eq!(Direction::Up.offset(), Vector::new(-1, 0));
        assert_eq!(Direction::Down.offset(), Vector::new(1, 0));
    }

    #[test]
    fn opposite_offsets_cancel() {
        let origin = Vector::new(0, 0);
        assert_eq!(Direction::Up.offset() + Direction::Down.offset(), origin);
        assert_eq!(Direction::Left.offset() + Direction::Right.offset(), origin);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tile_event_round_trips_through_bincode() {
        let event = Event::tile(
            EventKind::TileUpdated,
            TileSnapshot {
                id: TileId::new(7),
                position: Vector::new(3, 0),
                value: 64,
            },
        );
        assert_round_trip(&event);
    }

    #[test]
    fn board_event_round_trips_through_bincode() {
        let event = Event::board(
            EventKind::SweepCompleted,
            BoardSummary {
                rows: 4,
                columns: 4,
                score: 128,
                tiles: 5,
            },
        );
        assert_round_trip(&event);
    }

    #[test]
    fn command_round_trips_through_bincode() {
        assert_round_trip(&Command::Sweep {
            direction: Direction::Left,
        });
        assert_round_trip(&Command::Place { value: Some(4) });
    }
}
