//! Property-based invariant tests for the board model.
//!
//! 1. Loading a grid and reading it back is lossless.
//! 2. The score equals the sum of the grid snapshot.
//! 3. A slide finishes within the board's longest dimension and merges once.
//! 4. Sweeps over distinct values only pack tiles toward the target edge.
//! 5. Placement adds exactly one 2 or 4 on a previously empty cell.

use std::{cell::RefCell, rc::Rc};

use fivetwelve_board::{Board, Observable, Tile};
use fivetwelve_core::{Direction, Entity, Event, EventKind, Vector};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ── Strategies ────────────────────────────────────────────────────────────

fn cell_value() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => Just(0u32),
        4 => (1u32..=6).prop_map(|exponent| 1 << exponent),
    ]
}

fn grid_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
    (1usize..=6, 1usize..=6).prop_flat_map(|(rows, columns)| {
        proptest::collection::vec(proptest::collection::vec(cell_value(), columns), rows)
    })
}

/// Grid where every occupied cell holds a different power of two.
fn distinct_grid_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
    (1usize..=5, 1usize..=5).prop_flat_map(|(rows, columns)| {
        proptest::collection::vec(proptest::bool::ANY, rows * columns).prop_map(move |mask| {
            mask.chunks(columns)
                .enumerate()
                .map(|(row, cells)| {
                    cells
                        .iter()
                        .enumerate()
                        .map(|(column, occupied)| {
                            if *occupied {
                                2u32 << (row * columns + column)
                            } else {
                                0
                            }
                        })
                        .collect()
                })
                .collect()
        })
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn sorted_values(grid: &[Vec<u32>]) -> Vec<u32> {
    let mut values: Vec<u32> = grid.iter().flatten().copied().filter(|v| *v != 0).collect();
    values.sort_unstable();
    values
}

fn transpose(grid: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let columns = grid.first().map_or(0, Vec::len);
    (0..columns)
        .map(|column| grid.iter().map(|row| row[column]).collect())
        .collect()
}

/// Lines read in the order tiles travel toward the target edge, edge first.
fn lines_toward_edge(grid: &[Vec<u32>], direction: Direction) -> Vec<Vec<u32>> {
    let mut lines = match direction {
        Direction::Left | Direction::Right => grid.to_vec(),
        Direction::Up | Direction::Down => transpose(grid),
    };
    if matches!(direction, Direction::Right | Direction::Down) {
        for line in &mut lines {
            line.reverse();
        }
    }
    lines
}

// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grid_round_trips(grid in grid_strategy()) {
        let board = Board::with_grid(&grid).expect("well-formed grid");
        prop_assert_eq!(board.to_grid(), grid);
    }

    #[test]
    fn score_matches_grid_sum(grid in grid_strategy(), direction in direction_strategy()) {
        let mut board = Board::with_grid(&grid).expect("grid");
        let sum = |grid: &[Vec<u32>]| grid.iter().flatten().map(|v| u64::from(*v)).sum::<u64>();
        prop_assert_eq!(board.score(), sum(&grid));

        let _ = board.sweep(direction);
        prop_assert_eq!(board.score(), sum(&board.to_grid()));
        // Merging never creates or destroys value.
        prop_assert_eq!(board.score(), sum(&grid));
    }

    #[test]
    fn slide_terminates_and_merges_at_most_once(
        grid in grid_strategy(),
        direction in direction_strategy(),
        row_pick in any::<prop::sample::Index>(),
        column_pick in any::<prop::sample::Index>(),
    ) {
        let rows = grid.len();
        let columns = grid[0].len();
        let mut board = Board::new(rows, columns);
        let moves = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&moves);
        let _ = board.add_listener(Rc::new(move |event: &Event| {
            if event.kind == EventKind::TileUpdated {
                *counter.borrow_mut() += 1;
            }
        }));
        board.from_grid(&grid).expect("grid");

        let origin = Vector::new(row_pick.index(rows) as i32, column_pick.index(columns) as i32);
        let before = board.tile_at(origin).expect("in bounds").map(|t| (t.id(), t.value()));

        let _ = board.slide(origin, direction.offset()).expect("in bounds");

        // Every step emits one update; a merge adds one more.
        prop_assert!(*moves.borrow() <= rows.max(columns));
        if let Some((id, value)) = before {
            let after = board.tile(id).map(Tile::value).expect("sliding tile survives");
            prop_assert!(after == value || after == value * 2);
        } else {
            prop_assert_eq!(*moves.borrow(), 0);
        }
    }

    #[test]
    fn distinct_values_are_packed_toward_the_edge(
        grid in distinct_grid_strategy(),
        direction in direction_strategy(),
    ) {
        let mut board = Board::with_grid(&grid).expect("grid");
        let _ = board.sweep(direction);
        let after = board.to_grid();

        prop_assert_eq!(sorted_values(&after), sorted_values(&grid));
        let before_lines = lines_toward_edge(&grid, direction);
        let after_lines = lines_toward_edge(&after, direction);
        for (before, after) in before_lines.iter().zip(&after_lines) {
            let occupied: Vec<u32> = before.iter().copied().filter(|v| *v != 0).collect();
            let mut expected = occupied.clone();
            expected.resize(before.len(), 0);
            prop_assert_eq!(after, &expected);
        }
    }

    #[test]
    fn placement_adds_one_small_tile_on_an_empty_cell(
        grid in grid_strategy(),
        seed in any::<u64>(),
    ) {
        let mut board = Board::new(grid.len(), grid[0].len());
        let created = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&created);
        board.from_grid(&grid).expect("grid");
        let _ = board.add_listener(Rc::new(move |event: &Event| {
            if let (EventKind::TileCreated, Entity::Tile(snapshot)) = (event.kind, &event.entity) {
                sink.borrow_mut().push(*snapshot);
            }
        }));
        let empties = board.empty_positions();
        let tiles_before = board.tiles().count();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let outcome = board.place_with(None, &mut rng);

        if empties.is_empty() {
            prop_assert!(outcome.is_err());
            prop_assert!(created.borrow().is_empty());
        } else {
            let id = outcome.expect("room for a tile");
            let tile = board.tile(id).expect("placed tile");
            prop_assert_eq!(board.tiles().count(), tiles_before + 1);
            prop_assert!(tile.value() == 2 || tile.value() == 4);
            prop_assert!(empties.contains(&tile.position()));
            let created = created.borrow();
            prop_assert_eq!(created.as_slice(), &[tile.snapshot()]);
        }
    }
}

#[test]
fn default_placement_favours_twos() {
    let mut board = Board::with_seed(1, 1, 0);
    let mut twos = 0;
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..1_000 {
        board.from_grid(&[vec![0]]).expect("grid");
        let id = board.place_with(None, &mut rng).expect("place");
        if board.tile(id).map(Tile::value) == Some(2) {
            twos += 1;
        }
    }
    assert!((850..=950).contains(&twos), "observed {twos} twos out of 1000");
}
