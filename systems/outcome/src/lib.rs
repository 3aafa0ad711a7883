#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that derives whether a game can continue.
//!
//! The board only knows its cells; deciding that no sweep can change them is
//! a question about a snapshot, answered here from `Board::to_grid` output.

use fivetwelve_core::Direction;

/// Whether the player still has a legal move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// At least one sweep would change the board.
    InProgress,
    /// The board is full and no two neighbours share a value.
    Over,
}

/// Stateless evaluator over grid snapshots where 0 marks an empty cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct Outcome;

impl Outcome {
    /// Classifies the snapshot.
    #[must_use]
    pub fn assess(&self, grid: &[Vec<u32>]) -> GameState {
        let full = grid.iter().flatten().all(|value| *value != 0);
        if full && !has_equal_neighbours(grid) {
            GameState::Over
        } else {
            GameState::InProgress
        }
    }

    /// Directions whose sweep would change the snapshot.
    ///
    /// A sweep changes the board exactly when some tile has an empty or
    /// equal-valued neighbour on the side it is pushed toward.
    #[must_use]
    pub fn available_moves(&self, grid: &[Vec<u32>]) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| can_sweep(grid, *direction))
            .collect()
    }
}

fn value_at(grid: &[Vec<u32>], row: i32, column: i32) -> Option<u32> {
    let row = usize::try_from(row).ok()?;
    let column = usize::try_from(column).ok()?;
    grid.get(row)?.get(column).copied()
}

fn has_equal_neighbours(grid: &[Vec<u32>]) -> bool {
    can_sweep(grid, Direction::Right) || can_sweep(grid, Direction::Down)
}

fn can_sweep(grid: &[Vec<u32>], direction: Direction) -> bool {
    let step = direction.offset();
    for (row, cells) in grid.iter().enumerate() {
        for (column, value) in cells.iter().enumerate() {
            if *value == 0 {
                continue;
            }
            let next_row = row as i32 + step.row();
            let next_column = column as i32 + step.column();
            match value_at(grid, next_row, next_column) {
                Some(0) => return true,
                Some(neighbour) if neighbour == *value => return true,
                _ => {}
            }
        }
    }
    false
}
