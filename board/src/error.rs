//! Error types for the `fivetwelve-board` crate.

use fivetwelve_core::{TileId, Vector};

/// Caller mistakes reported by board operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A tile was requested on a board without any empty cell.
    #[error("no empty cell is available for a new tile")]
    NoSpace,

    /// A tile value of zero was requested; zero marks an empty cell.
    #[error("tile value {value} is not positive")]
    InvalidValue {
        /// Rejected value.
        value: u32,
    },

    /// A position outside the grid was used to address a cell.
    #[error("position ({}, {}) lies outside the {rows}x{columns} board", .position.row(), .position.column())]
    OutOfBounds {
        /// Offending position.
        position: Vector,
        /// Board row count.
        rows: usize,
        /// Board column count.
        columns: usize,
    },

    /// A grid row does not have the same length as the first row.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// A grid does not have the board's dimensions.
    #[error("grid is {found_rows}x{found_columns}, board is {rows}x{columns}")]
    DimensionMismatch {
        /// Board row count.
        rows: usize,
        /// Board column count.
        columns: usize,
        /// Grid row count.
        found_rows: usize,
        /// Grid column count.
        found_columns: usize,
    },

    /// The board has handed out every tile identifier it can represent.
    #[error("tile identifiers are exhausted")]
    TileIdsExhausted,

    /// No live tile carries the identifier.
    #[error("tile {} is not on the board", .0.get())]
    UnknownTile(TileId),
}
