#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state and rules for FiveTwelve.
//!
//! The [`Board`] owns every [`Tile`] in an arena keyed by [`TileId`]; grid
//! cells hold identifiers rather than tiles. Each mutation is announced
//! synchronously to the listeners registered through the [`Observable`]
//! capability. Tile events reach both the tile's own listeners and the
//! board's current listeners. Nothing here depends on how, or whether, the
//! state is drawn.

mod config;
mod error;
mod observe;
mod tile;

use std::collections::BTreeMap;

use fivetwelve_core::{
    BoardSummary, Command, Direction, Event, EventKind, ListenerId, TileId, Vector, GRID_SIZE,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

pub use config::Config;
pub use error::BoardError;
pub use observe::{Listener, Observable, Observers};
pub use tile::Tile;

/// Largest row or column count a board accepts; positions are `i32` based.
pub const MAX_SIDE: usize = i32::MAX as usize;

/// Rectangular grid of optional tiles together with the rules that move them.
#[derive(Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Option<TileId>>,
    tiles: BTreeMap<TileId, Tile>,
    next_tile: u32,
    observers: Observers,
    rng: ChaCha8Rng,
}

impl Board {
    /// Creates an empty board whose placement RNG is seeded from the OS.
    ///
    /// Dimensions above [`MAX_SIDE`] are capped to it.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::with_rng(rows, columns, ChaCha8Rng::from_entropy())
    }

    /// Creates an empty board with a reproducible placement RNG.
    #[must_use]
    pub fn with_seed(rows: usize, columns: usize, seed: u64) -> Self {
        Self::with_rng(rows, columns, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates an empty board described by the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(config.rows, config.columns, seed),
            None => Self::new(config.rows, config.columns),
        }
    }

    /// Creates a board shaped like `values` and loads them into it.
    pub fn with_grid(values: &[Vec<u32>]) -> Result<Self, BoardError> {
        let columns = values.first().map_or(0, Vec::len);
        let mut board = Self::new(values.len(), columns);
        board.from_grid(values)?;
        Ok(board)
    }

    fn with_rng(rows: usize, columns: usize, rng: ChaCha8Rng) -> Self {
        let rows = rows.min(MAX_SIDE);
        let columns = columns.min(MAX_SIDE);
        Self {
            rows,
            columns,
            cells: vec![None; rows.saturating_mul(columns)],
            tiles: BTreeMap::new(),
            next_tile: 0,
            observers: Observers::new(),
            rng,
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Reports whether the position addresses a cell of this board.
    #[must_use]
    pub fn in_bounds(&self, position: Vector) -> bool {
        self.index(position).is_some()
    }

    /// Returns the tile occupying the position, if any.
    pub fn tile_at(&self, position: Vector) -> Result<Option<&Tile>, BoardError> {
        let index = self.checked_index(position)?;
        Ok(self.cells[index].and_then(|id| self.tiles.get(&id)))
    }

    /// Returns the live tile with the identifier, if any.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Iterates over the live tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells
            .iter()
            .flatten()
            .filter_map(|id| self.tiles.get(id))
    }

    /// Lists every empty cell in row-major order.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Vector> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| self.position_of(index))
            .collect()
    }

    /// Reports whether at least one cell is empty.
    #[must_use]
    pub fn has_empty(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// Places a tile on a uniformly chosen empty cell using the board's RNG.
    ///
    /// Without an explicit value the tile is a 2 nine times out of ten and a 4
    /// otherwise. Fails with [`BoardError::NoSpace`] on a full board and with
    /// [`BoardError::TileIdsExhausted`] once no fresh identifier remains.
    pub fn place(&mut self, value: Option<u32>) -> Result<TileId, BoardError> {
        let empties = self.empty_positions();
        let (position, value) = draw_placement(&empties, value, &mut self.rng)?;
        self.spawn(position, value)
    }

    /// Same as [`Board::place`] but draws from the provided RNG.
    pub fn place_with<R: Rng + ?Sized>(
        &mut self,
        value: Option<u32>,
        rng: &mut R,
    ) -> Result<TileId, BoardError> {
        let empties = self.empty_positions();
        let (position, value) = draw_placement(&empties, value, rng)?;
        self.spawn(position, value)
    }

    /// Snapshot of the cell values; empty cells read as 0.
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<u32>> {
        if self.columns == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells
            .chunks(self.columns)
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.and_then(|id| self.tiles.get(&id))
                            .map_or(0, Tile::value)
                    })
                    .collect()
            })
            .collect()
    }

    /// Replaces the board contents with fresh tiles holding the given values.
    ///
    /// Zero marks an empty cell. The grid must be rectangular and match the
    /// board's dimensions; on error the board is left untouched. Listeners
    /// receive one [`EventKind::BoardReset`] followed by a
    /// [`EventKind::TileCreated`] per new tile.
    pub fn from_grid(&mut self, values: &[Vec<u32>]) -> Result<(), BoardError> {
        let found_columns = values.first().map_or(0, Vec::len);
        for (row, cells) in values.iter().enumerate() {
            if cells.len() != found_columns {
                return Err(BoardError::Ragged {
                    row,
                    expected: found_columns,
                    found: cells.len(),
                });
            }
        }
        let columns_match = found_columns == self.columns || values.is_empty();
        if values.len() != self.rows || !columns_match {
            return Err(BoardError::DimensionMismatch {
                rows: self.rows,
                columns: self.columns,
                found_rows: values.len(),
                found_columns,
            });
        }
        let needed = values.iter().flatten().filter(|value| **value != 0).count();
        if needed > self.ids_left() {
            return Err(BoardError::TileIdsExhausted);
        }

        self.cells.fill(None);
        self.tiles.clear();
        let mut created = Vec::new();
        for (index, value) in values.iter().flatten().copied().enumerate() {
            if value == 0 {
                continue;
            }
            let id = self.allocate_tile(self.position_of(index), value)?;
            self.cells[index] = Some(id);
            created.push(id);
        }
        debug!(tiles = created.len(), "board loaded from grid");

        self.notify_all(&Event::board(EventKind::BoardReset, self.summary()));
        for id in created {
            if let Some(tile) = self.tiles.get(&id) {
                self.notify_all(&Event::tile(EventKind::TileCreated, tile.snapshot()));
            }
        }
        Ok(())
    }

    /// Slides the tile at `position` by `step` until it is blocked, merges, or
    /// reaches the edge.
    ///
    /// An empty cell or a zero step is a no-op, and a step that would overflow
    /// the coordinates counts as leaving the board. Returns whether the tile
    /// moved.
    pub fn slide(&mut self, position: Vector, step: Vector) -> Result<bool, BoardError> {
        let _ = self.checked_index(position)?;
        Ok(self.slide_tile(position, step))
    }

    /// Pushes every tile toward the right edge.
    pub fn right(&mut self) -> bool {
        self.sweep(Direction::Right)
    }

    /// Pushes every tile toward the left edge.
    pub fn left(&mut self) -> bool {
        self.sweep(Direction::Left)
    }

    /// Pushes every tile toward the top edge.
    pub fn up(&mut self) -> bool {
        self.sweep(Direction::Up)
    }

    /// Pushes every tile toward the bottom edge.
    pub fn down(&mut self) -> bool {
        self.sweep(Direction::Down)
    }

    /// Slides every tile toward the edge named by `direction`.
    ///
    /// Cells nearest the target edge are visited first so a sliding tile never
    /// jumps over one that has not moved yet. Returns whether any tile moved
    /// or merged. Listeners receive [`EventKind::SweepCompleted`] afterwards.
    pub fn sweep(&mut self, direction: Direction) -> bool {
        let step = direction.offset();
        let mut changed = false;
        for position in self.traversal(direction) {
            changed |= self.slide_tile(position, step);
        }
        debug!(?direction, changed, score = self.score(), "sweep completed");
        self.notify_all(&Event::board(EventKind::SweepCompleted, self.summary()));
        changed
    }

    /// Sum of the values of every tile on the board.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.tiles.values().map(|tile| u64::from(tile.value())).sum()
    }

    /// Aggregate state attached to board-level events.
    #[must_use]
    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            rows: self.rows,
            columns: self.columns,
            score: self.score(),
            tiles: self.tiles.len(),
        }
    }

    /// Events that rebuild the current board from nothing: one
    /// [`EventKind::BoardReset`] then a [`EventKind::TileCreated`] per tile in
    /// row-major order.
    ///
    /// Lets a listener registered mid-game catch up without touching the board.
    #[must_use]
    pub fn snapshot_events(&self) -> Vec<Event> {
        std::iter::once(Event::board(EventKind::BoardReset, self.summary()))
            .chain(
                self.tiles()
                    .map(|tile| Event::tile(EventKind::TileCreated, tile.snapshot())),
            )
            .collect()
    }

    /// Attaches a listener to one live tile; the board's own listeners
    /// already receive every tile event.
    pub fn add_tile_listener(
        &mut self,
        id: TileId,
        listener: Listener,
    ) -> Result<ListenerId, BoardError> {
        self.tiles
            .get_mut(&id)
            .map(|tile| tile.add_listener(listener))
            .ok_or(BoardError::UnknownTile(id))
    }

    fn slide_tile(&mut self, mut position: Vector, step: Vector) -> bool {
        if step == Vector::new(0, 0) {
            return false;
        }
        let Some(mut from) = self.index(position) else {
            return false;
        };
        let Some(id) = self.cells[from] else {
            return false;
        };

        let mut moved = false;
        loop {
            let Some(next) = position.checked_add(step) else {
                break;
            };
            let Some(to) = self.index(next) else {
                break;
            };
            let occupant = self.cells[to];
            match occupant {
                None => self.relocate(id, from, to, next),
                Some(other) if self.mergeable(id, other) => {
                    self.absorb(id, other, to);
                    self.relocate(id, from, to, next);
                    return true;
                }
                Some(_) => break,
            }
            moved = true;
            position = next;
            from = to;
        }
        moved
    }

    fn mergeable(&self, id: TileId, other: TileId) -> bool {
        match (self.tiles.get(&id), self.tiles.get(&other)) {
            (Some(tile), Some(neighbour)) => tile == neighbour,
            _ => false,
        }
    }

    fn absorb(&mut self, survivor: TileId, absorbed: TileId, cell: usize) {
        let Some(absorbed_tile) = self.tiles.remove(&absorbed) else {
            return;
        };
        self.cells[cell] = None;
        let Some(tile) = self.tiles.get_mut(&survivor) else {
            return;
        };
        tile.merge(&absorbed_tile);
        let merged = tile.snapshot();
        debug!(
            survivor = survivor.get(),
            absorbed = absorbed.get(),
            value = merged.value,
            "tiles merged"
        );
        self.notify_all(&Event::tile(EventKind::TileUpdated, merged));
        self.notify_all(&Event::tile(EventKind::TileRemoved, absorbed_tile.snapshot()));
    }

    fn relocate(&mut self, id: TileId, from: usize, to: usize, position: Vector) {
        self.cells[to] = Some(id);
        self.cells[from] = None;
        let Some(tile) = self.tiles.get_mut(&id) else {
            return;
        };
        trace!(tile = id.get(), row = position.row(), column = position.column(), "tile moved");
        tile.move_to(position);
        let moved = tile.snapshot();
        self.notify_all(&Event::tile(EventKind::TileUpdated, moved));
    }

    fn spawn(&mut self, position: Vector, value: u32) -> Result<TileId, BoardError> {
        let id = self.allocate_tile(position, value)?;
        if let Some(index) = self.index(position) {
            self.cells[index] = Some(id);
        }
        debug!(
            tile = id.get(),
            row = position.row(),
            column = position.column(),
            value,
            "tile placed"
        );
        if let Some(tile) = self.tiles.get(&id) {
            self.notify_all(&Event::tile(EventKind::TileCreated, tile.snapshot()));
        }
        Ok(id)
    }

    fn ids_left(&self) -> usize {
        usize::try_from(u32::MAX - self.next_tile).unwrap_or(usize::MAX)
    }

    fn allocate_tile(&mut self, position: Vector, value: u32) -> Result<TileId, BoardError> {
        let id = TileId::new(self.next_tile);
        self.next_tile = self
            .next_tile
            .checked_add(1)
            .ok_or(BoardError::TileIdsExhausted)?;
        let _ = self.tiles.insert(id, Tile::new(id, position, value));
        Ok(id)
    }

    fn traversal(&self, direction: Direction) -> Vec<Vector> {
        let mut order = Vec::with_capacity(self.cells.len());
        match direction {
            Direction::Right => {
                for row in 0..self.rows {
                    for column in (0..self.columns).rev() {
                        order.push(cell(row, column));
                    }
                }
            }
            Direction::Left => {
                for row in 0..self.rows {
                    for column in 0..self.columns {
                        order.push(cell(row, column));
                    }
                }
            }
            Direction::Up => {
                for column in 0..self.columns {
                    for row in 0..self.rows {
                        order.push(cell(row, column));
                    }
                }
            }
            Direction::Down => {
                for column in 0..self.columns {
                    for row in (0..self.rows).rev() {
                        order.push(cell(row, column));
                    }
                }
            }
        }
        order
    }

    fn checked_index(&self, position: Vector) -> Result<usize, BoardError> {
        self.index(position).ok_or(BoardError::OutOfBounds {
            position,
            rows: self.rows,
            columns: self.columns,
        })
    }

    fn index(&self, position: Vector) -> Option<usize> {
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        if row < self.rows && column < self.columns {
            Some(row * self.columns + column)
        } else {
            None
        }
    }

    fn position_of(&self, index: usize) -> Vector {
        cell(index / self.columns, index % self.columns)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GRID_SIZE, GRID_SIZE)
    }
}

impl Observable for Board {
    fn observers(&self) -> &Observers {
        &self.observers
    }

    fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }
}

/// Applies the provided command to the board.
///
/// Returns whether the board changed: a sweep reports if any tile moved, a
/// successful placement always changes the board.
pub fn apply(board: &mut Board, command: Command) -> Result<bool, BoardError> {
    match command {
        Command::Sweep { direction } => Ok(board.sweep(direction)),
        Command::Place { value } => board.place(value).map(|_| true),
    }
}

/// Position of a cell; indices never exceed [`MAX_SIDE`] so the conversion
/// only saturates on misuse.
fn cell(row: usize, column: usize) -> Vector {
    let row = i32::try_from(row).unwrap_or(i32::MAX);
    let column = i32::try_from(column).unwrap_or(i32::MAX);
    Vector::new(row, column)
}

fn draw_placement<R: Rng + ?Sized>(
    empties: &[Vector],
    value: Option<u32>,
    rng: &mut R,
) -> Result<(Vector, u32), BoardError> {
    if let Some(0) = value {
        return Err(BoardError::InvalidValue { value: 0 });
    }
    let position = *empties.choose(rng).ok_or(BoardError::NoSpace)?;
    let value = value.unwrap_or_else(|| if rng.gen_range(0..10) < 9 { 2 } else { 4 });
    Ok((position, value))
}
