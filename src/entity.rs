//! Shared entity primitives
//!
//! Grid cells and directions for the discrete games, axis-aligned boxes for
//! the runner, and the discriminated snapshot kinds handed to the render
//! adapter. Nothing here owns game rules; it is geometry plus plain data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A cell on a discrete game grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell one step away in the given direction.
    pub fn step(&self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether the cell lies inside a `width` x `height` grid.
    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

/// Four-way movement direction. Grid y grows downward (screen convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit cell offset for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Axis-aligned bounding box (top-left origin, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test; touching edges do not count as intersection.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// Snapshot of a single simulated object, consumed by the render adapter.
/// Discriminated by kind; the adapter must not mutate these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityView {
    SnakeSegment { cell: GridPos, head: bool },
    Food { cell: GridPos },
    Player { body: Aabb, grounded: bool },
    Obstacle { body: Aabb },
    Cloud { body: Aabb },
    Mole { cell: usize, active: bool, whacked: bool },
    Card { index: usize, pair: u8, face: CardFace },
    Tile { slot: usize, home: usize },
    EmptySlot { slot: usize },
    Mark { cell: usize, mark: char },
}

/// Visible state of a memory card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    Hidden,
    Revealed,
    Solved,
}
