//! Numbered pieces that slide around the board.

use fivetwelve_core::{Event, EventKind, TileId, TileSnapshot, Vector};

use crate::observe::{Observable, Observers};

/// A positioned, valued game piece.
///
/// A tile only notifies the listeners registered on it directly; the owning
/// board relays the same events to its own listeners.
///
/// Tiles compare equal when their values match; identity and position are
/// irrelevant to whether two tiles may merge.
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    position: Vector,
    value: u32,
    observers: Observers,
}

impl Tile {
    /// Creates a tile with no listeners.
    #[must_use]
    pub fn new(id: TileId, position: Vector, value: u32) -> Self {
        Self {
            id,
            position,
            value,
            observers: Observers::new(),
        }
    }

    /// Identifier allocated to the tile.
    #[must_use]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Cell the tile occupies.
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.position
    }

    /// Face value of the tile.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Captures the tile's current state for notifications.
    #[must_use]
    pub const fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            id: self.id,
            position: self.position,
            value: self.value,
        }
    }

    /// Records a new position and announces the update.
    pub fn move_to(&mut self, position: Vector) {
        self.position = position;
        self.notify_all(&Event::tile(EventKind::TileUpdated, self.snapshot()));
    }

    /// Absorbs the value of `other`.
    ///
    /// Announces the update of this tile first, then the removal of `other`
    /// through `other`'s own listeners. Evicting `other` from any grid is the
    /// caller's job.
    pub fn merge(&mut self, other: &Tile) {
        self.value = self.value.saturating_add(other.value);
        self.notify_all(&Event::tile(EventKind::TileUpdated, self.snapshot()));
        other.notify_all(&Event::tile(EventKind::TileRemoved, other.snapshot()));
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tile {}

impl Observable for Tile {
    fn observers(&self) -> &Observers {
        &self.observers
    }

    fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }
}
