//! The six game controllers
//!
//! Each game owns its session, entities, RNG and timers; there is no shared
//! engine beyond the scheduler/session/score building blocks. Snake, Runner
//! and Whack-a-Mole are timer-driven; Memory uses a single one-shot delay;
//! Puzzle and Tic-Tac-Toe are purely click-driven.

pub mod memory;
pub mod mole;
pub mod puzzle;
pub mod runner;
pub mod snake;
pub mod tictactoe;

pub use memory::MemoryGame;
pub use mole::MoleGame;
pub use puzzle::PuzzleGame;
pub use runner::RunnerGame;
pub use snake::SnakeGame;
pub use tictactoe::TicTacToe;
