#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text rendering adapter for FiveTwelve.
//!
//! The view never reads the board. It mirrors tile state purely from the
//! event feed: a [`TextView`] hands out a listener that folds every event into
//! a [`Scene`], and the scene draws itself as fixed-width text.

use std::{cell::RefCell, collections::BTreeMap, fmt::Write as _, rc::Rc};

use fivetwelve_core::{BoardSummary, Entity, Event, EventKind, TileId, TileSnapshot};
use tracing::warn;

const MIN_CELL_WIDTH: usize = 4;

/// Presentation-side copy of the board assembled from events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scene {
    rows: usize,
    columns: usize,
    tiles: BTreeMap<TileId, TileSnapshot>,
    sweeps: u64,
}

impl Scene {
    /// Creates an empty scene for a board of the given dimensions.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    /// Folds one event into the scene.
    pub fn apply(&mut self, event: &Event) {
        match (event.kind, &event.entity) {
            (EventKind::TileCreated | EventKind::TileUpdated, Entity::Tile(snapshot)) => {
                let _ = self.tiles.insert(snapshot.id, *snapshot);
            }
            (EventKind::TileRemoved, Entity::Tile(snapshot)) => {
                let _ = self.tiles.remove(&snapshot.id);
            }
            (EventKind::BoardReset, Entity::Board(summary)) => {
                self.tiles.clear();
                self.resize(summary);
            }
            (EventKind::SweepCompleted, Entity::Board(summary)) => {
                self.sweeps = self.sweeps.saturating_add(1);
                self.resize(summary);
            }
            (kind, _) => warn!(?kind, "event carries an unexpected entity"),
        }
    }

    fn resize(&mut self, summary: &BoardSummary) {
        self.rows = summary.rows;
        self.columns = summary.columns;
    }

    /// Number of completed sweeps observed.
    #[must_use]
    pub const fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// Sum of the values of every visible tile.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.tiles.values().map(|tile| u64::from(tile.value)).sum()
    }

    /// Visible cell values; empty cells read as 0.
    ///
    /// Tiles whose position falls outside the known dimensions are skipped.
    #[must_use]
    pub fn grid(&self) -> Vec<Vec<u32>> {
        let mut grid = vec![vec![0; self.columns]; self.rows];
        for tile in self.tiles.values() {
            let (Ok(row), Ok(column)) = (
                usize::try_from(tile.position.row()),
                usize::try_from(tile.position.column()),
            ) else {
                continue;
            };
            if let Some(cell) = grid.get_mut(row).and_then(|cells| cells.get_mut(column)) {
                *cell = tile.value;
            }
        }
        grid
    }

    /// Draws the grid as right-aligned columns followed by a score line.
    #[must_use]
    pub fn render(&self) -> String {
        let grid = self.grid();
        let width = grid
            .iter()
            .flatten()
            .map(|value| value.to_string().len())
            .max()
            .unwrap_or(0)
            .max(MIN_CELL_WIDTH);

        let mut out = String::new();
        for row in &grid {
            let line: Vec<String> = row
                .iter()
                .map(|value| match value {
                    0 => format!("{:>width$}", "."),
                    value => format!("{value:>width$}"),
                })
                .collect();
            let _ = writeln!(out, "{}", line.join(" "));
        }
        let _ = writeln!(out, "Score: {}  Moves: {}", self.score(), self.sweeps);
        out
    }
}

/// View that keeps a [`Scene`] current by listening to a board.
#[derive(Clone, Debug, Default)]
pub struct TextView {
    scene: Rc<RefCell<Scene>>,
}

impl TextView {
    /// Creates a view for a board of the given dimensions.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            scene: Rc::new(RefCell::new(Scene::new(rows, columns))),
        }
    }

    /// Callback to register with the board; it only holds the scene.
    #[must_use]
    pub fn listener(&self) -> Rc<dyn Fn(&Event)> {
        let scene = Rc::clone(&self.scene);
        Rc::new(move |event: &Event| scene.borrow_mut().apply(event))
    }

    /// Copy of the current scene.
    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene.borrow().clone()
    }

    /// Renders the current scene.
    #[must_use]
    pub fn render(&self) -> String {
        self.scene.borrow().render()
    }
}
