//! Input events
//!
//! Discrete commands produced by an external input adapter. Invalid inputs
//! (reversals, clicks on filled or inactive cells) are silently ignored by
//! the receiving game - input never errors.

use serde::{Deserialize, Serialize};

use crate::entity::Direction;

/// Every input the six games accept, tagged by target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Snake steering. Buffered one tick; reversals rejected.
    Turn(Direction),
    /// Runner jump trigger. Only effective while grounded.
    Jump,
    /// Pointer click carrying a cell/entity identifier
    /// (mole cell, card index, puzzle slot, board cell).
    CellClick(usize),
}
