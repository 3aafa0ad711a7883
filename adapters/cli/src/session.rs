use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use fivetwelve_board::{apply, Board, Observable};
use fivetwelve_core::{Command, Direction};
use fivetwelve_rendering::TextView;
use fivetwelve_system_outcome::{GameState, Outcome};
use tracing::{debug, info};

const OPENING_TILES: usize = 2;

/// Player intent decoded from one input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Sweep(Direction),
    Quit,
}

/// Maps a line of keyboard input to an intent, ignoring surrounding blanks.
pub(crate) fn parse_input(line: &str) -> Option<Input> {
    let input = match line.trim().to_ascii_lowercase().as_str() {
        "w" | "k" | "up" => Input::Sweep(Direction::Up),
        "a" | "h" | "left" => Input::Sweep(Direction::Left),
        "s" | "j" | "down" => Input::Sweep(Direction::Down),
        "d" | "l" | "right" => Input::Sweep(Direction::Right),
        "q" | "quit" | "exit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) score: u64,
    pub(crate) sweeps: u64,
    pub(crate) state: GameState,
}

/// Controller binding a board to a text view and a line-oriented input.
pub(crate) struct Session {
    board: Board,
    view: TextView,
    outcome: Outcome,
}

impl Session {
    /// Wires the view to the board, first replaying the tiles already on it.
    pub(crate) fn new(mut board: Board) -> Self {
        let view = TextView::new(board.rows(), board.columns());
        let listener = view.listener();
        for event in board.snapshot_events() {
            listener(&event);
        }
        let _ = board.add_listener(listener);
        Self {
            board,
            view,
            outcome: Outcome,
        }
    }

    /// Plays until the input ends, the player quits, or no move remains.
    pub(crate) fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<Summary> {
        for _ in 0..OPENING_TILES {
            if self.board.has_empty() {
                let _ = apply(&mut self.board, Command::Place { value: None })?;
            }
        }
        self.draw(&mut output)?;

        let mut state = self.outcome.assess(&self.board.to_grid());
        let mut lines = input.lines();
        while state == GameState::InProgress {
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("failed to read player input")?;
            let direction = match parse_input(&line) {
                Some(Input::Sweep(direction)) => direction,
                Some(Input::Quit) => break,
                None => {
                    writeln!(output, "keys: w/a/s/d to move, q to quit")
                        .context("failed to write prompt")?;
                    continue;
                }
            };

            let changed = apply(&mut self.board, Command::Sweep { direction })?;
            if changed && self.board.has_empty() {
                let _ = apply(&mut self.board, Command::Place { value: None })?;
            }
            debug!(?direction, changed, "player move applied");
            self.draw(&mut output)?;
            state = self.outcome.assess(&self.board.to_grid());
        }

        if state == GameState::Over {
            writeln!(output, "No moves left.").context("failed to write result")?;
        }
        let summary = Summary {
            score: self.board.score(),
            sweeps: self.view.scene().sweeps(),
            state,
        };
        info!(score = summary.score, sweeps = summary.sweeps, ?state, "session finished");
        Ok(summary)
    }

    fn draw<W: Write>(&self, output: &mut W) -> Result<()> {
        write!(output, "{}", self.view.render()).context("failed to draw board")?;
        output.flush().context("failed to flush output")
    }
}
