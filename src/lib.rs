//! Arcade Sim - headless fixed-tick mini-game cores
//!
//! Core modules:
//! - `sched`: deterministic virtual-time scheduler (cancellable tasks)
//! - `entity`: grid cells, AABBs and render snapshot kinds
//! - `session`: per-game running/score/terminal state
//! - `scores`: best-score persistence over a string key-value store
//! - `render`: render adapter seam (the sim never draws)
//! - `games`: the six game controllers
//!
//! Everything is single-threaded and deterministic: seeded RNG, fixed tick
//! cadences, and time that only moves when the embedder advances it.

pub mod config;
pub mod entity;
pub mod games;
pub mod input;
pub mod render;
pub mod sched;
pub mod scores;
pub mod session;

pub use config::Tuning;
pub use games::{MemoryGame, MoleGame, PuzzleGame, RunnerGame, SnakeGame, TicTacToe};
pub use input::InputEvent;
pub use render::{NullRenderer, RenderAdapter, Scene};
pub use scores::{KvStore, MemoryStore, ScoreGateway};
pub use session::{GameEvent, Session, TerminalReason};
