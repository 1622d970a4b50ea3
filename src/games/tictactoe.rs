//! Tic-Tac-Toe
//!
//! Plain alternating-mark board. No timers, no entity motion; clicks on
//! filled cells or after the game ends fall through silently.

use serde::{Deserialize, Serialize};

use crate::entity::EntityView;
use crate::input::InputEvent;
use crate::render::Scene;
use crate::session::Session;

/// The eight winning lines.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Mark),
    Draw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicTacToe {
    session: Session,
    board: [Option<Mark>; 9],
    turn: Mark,
    outcome: Option<Outcome>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            board: [None; 9],
            turn: Mark::X,
            outcome: None,
        }
    }

    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.board = [None; 9];
        self.turn = Mark::X;
        self.outcome = None;
        true
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.board = [None; 9];
        self.turn = Mark::X;
        self.outcome = None;
    }

    pub fn handle(&mut self, input: InputEvent) -> Option<Outcome> {
        match input {
            InputEvent::CellClick(cell) => self.play(cell),
            _ => None,
        }
    }

    /// Place the current mark. Filled cells, out-of-range cells and moves
    /// after the game ended are ignored. Returns the outcome when this move
    /// ends the game.
    pub fn play(&mut self, cell: usize) -> Option<Outcome> {
        if !self.session.is_running() || self.outcome.is_some() || cell >= 9 {
            return None;
        }
        if self.board[cell].is_some() {
            return None;
        }

        self.board[cell] = Some(self.turn);

        if let Some(winner) = self.winner() {
            self.outcome = Some(Outcome::Win(winner));
        } else if self.board.iter().all(|c| c.is_some()) {
            self.outcome = Some(Outcome::Draw);
        } else {
            self.turn = self.turn.other();
            return None;
        }

        self.session.finish(crate::session::TerminalReason::Cleared);
        log::info!("Tic-Tac-Toe over: {:?}", self.outcome);
        self.outcome
    }

    fn winner(&self) -> Option<Mark> {
        for line in LINES {
            if let [Some(a), Some(b), Some(c)] = line.map(|i| self.board[i]) {
                if a == b && b == c {
                    return Some(a);
                }
            }
        }
        None
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.board[index]
    }

    pub fn scene(&self) -> Scene {
        let entities = self
            .board
            .iter()
            .enumerate()
            .filter_map(|(cell, mark)| {
                mark.map(|m| EntityView::Mark {
                    cell,
                    mark: m.as_char(),
                })
            })
            .collect();

        Scene {
            entities,
            score: self.session.score(),
            ticks: self.session.ticks,
            remaining_ms: None,
            running: self.session.is_running(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_alternate() {
        let mut g = TicTacToe::new();
        g.start();
        assert_eq!(g.turn(), Mark::X);
        g.play(0);
        assert_eq!(g.turn(), Mark::O);
        g.play(1);
        assert_eq!(g.turn(), Mark::X);
    }

    #[test]
    fn test_filled_cell_click_is_ignored() {
        let mut g = TicTacToe::new();
        g.start();
        g.play(4);
        assert!(g.play(4).is_none());
        // Turn did not advance on the rejected move.
        assert_eq!(g.turn(), Mark::O);
        assert_eq!(g.cell(4), Some(Mark::X));
    }

    #[test]
    fn test_row_win() {
        let mut g = TicTacToe::new();
        g.start();
        // X: 0 1 2, O: 3 4
        g.play(0);
        g.play(3);
        g.play(1);
        g.play(4);
        let outcome = g.play(2);

        assert_eq!(outcome, Some(Outcome::Win(Mark::X)));
        assert!(!g.session().is_running());
        // Board is locked after the win.
        assert!(g.play(5).is_none());
        assert_eq!(g.cell(5), None);
    }

    #[test]
    fn test_diagonal_win_for_o() {
        let mut g = TicTacToe::new();
        g.start();
        // X: 1 3 5, O: 0 4 8
        g.play(1);
        g.play(0);
        g.play(3);
        g.play(4);
        g.play(5);
        assert_eq!(g.play(8), Some(Outcome::Win(Mark::O)));
    }

    #[test]
    fn test_draw_on_full_board() {
        let mut g = TicTacToe::new();
        g.start();
        // X O X / X X O / O X O - no line.
        for cell in [0, 1, 2, 5, 3, 6, 4, 8, 7] {
            g.play(cell);
        }
        assert_eq!(g.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_click_events_route_to_cells() {
        let mut g = TicTacToe::new();
        g.start();
        g.handle(InputEvent::CellClick(4));
        assert_eq!(g.cell(4), Some(Mark::X));
        // Non-click inputs fall through.
        assert!(g.handle(InputEvent::Jump).is_none());
    }

    #[test]
    fn test_moves_before_start_ignored() {
        let mut g = TicTacToe::new();
        assert!(g.play(0).is_none());
        assert_eq!(g.cell(0), None);
    }
}
