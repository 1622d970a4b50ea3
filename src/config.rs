//! Game tuning
//!
//! Data-driven balance knobs for every game, persisted as JSON the same way
//! settings are. Malformed input degrades to defaults instead of erroring.

use serde::{Deserialize, Serialize};

/// Snake grid and cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeTuning {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Fixed tick interval (ms).
    pub tick_ms: u64,
    pub start_length: usize,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            tick_ms: 120,
            start_length: 3,
        }
    }
}

/// Runner kinematics and spawn pacing. Coordinates are screen-style
/// (y grows downward, ground at `ground_y`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerTuning {
    pub tick_ms: u64,
    /// Playfield width; entities past x < -width margin are dropped.
    pub field_width: f32,
    pub ground_y: f32,
    /// Added to vertical velocity each tick while airborne.
    pub gravity: f32,
    /// Upward velocity applied on jump (negative = up).
    pub jump_velocity: f32,
    /// Horizontal scroll speed per tick.
    pub scroll_speed: f32,
    pub player_size: (f32, f32),
    pub obstacle_size: (f32, f32),
    pub cloud_size: (f32, f32),
    /// Spawn an obstacle every this many ticks (tightens over time).
    pub obstacle_spawn_ticks: u64,
    /// Hard floor for the spawn interval.
    pub min_obstacle_spawn_ticks: u64,
    /// Every this many ticks the obstacle interval shrinks by one.
    pub ramp_every_ticks: u64,
    pub cloud_spawn_ticks: u64,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            tick_ms: 20,
            field_width: 800.0,
            ground_y: 300.0,
            gravity: 2.2,
            jump_velocity: -26.0,
            scroll_speed: 8.0,
            player_size: (40.0, 40.0),
            obstacle_size: (24.0, 48.0),
            cloud_size: (60.0, 24.0),
            obstacle_spawn_ticks: 90,
            min_obstacle_spawn_ticks: 45,
            ramp_every_ticks: 500,
            cloud_spawn_ticks: 140,
        }
    }
}

/// Whack-a-Mole board and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoleTuning {
    pub cells: usize,
    /// Total session countdown (ms).
    pub session_ms: u64,
    /// Uniform activation duration range [min, max) in ms.
    pub min_active_ms: u64,
    pub max_active_ms: u64,
}

impl Default for MoleTuning {
    fn default() -> Self {
        Self {
            cells: 9,
            session_ms: 30_000,
            min_active_ms: 600,
            max_active_ms: 1500,
        }
    }
}

/// Memory Match deck and reveal timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryTuning {
    pub pairs: u8,
    /// How long a mismatched pair stays visible (ms).
    pub reveal_delay_ms: u64,
}

impl Default for MemoryTuning {
    fn default() -> Self {
        Self {
            pairs: 8,
            reveal_delay_ms: 900,
        }
    }
}

/// Sliding puzzle dimensions and scramble depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleTuning {
    /// Board is side x side with one empty slot.
    pub side: usize,
    /// Random legal moves applied when shuffling.
    pub shuffle_moves: usize,
}

impl Default for PuzzleTuning {
    fn default() -> Self {
        Self {
            side: 3,
            shuffle_moves: 80,
        }
    }
}

/// All tuning in one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub snake: SnakeTuning,
    #[serde(default)]
    pub runner: RunnerTuning,
    #[serde(default)]
    pub mole: MoleTuning,
    #[serde(default)]
    pub memory: MemoryTuning,
    #[serde(default)]
    pub puzzle: PuzzleTuning,
}

impl Tuning {
    /// Parse from JSON, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Malformed tuning JSON, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut t = Tuning::default();
        t.snake.tick_ms = 80;
        let back = Tuning::from_json(&t.to_json());
        assert_eq!(back.snake.tick_ms, 80);
    }

    #[test]
    fn test_malformed_falls_back() {
        let t = Tuning::from_json("{ nope");
        assert_eq!(t.mole.cells, MoleTuning::default().cells);
    }

    #[test]
    fn test_partial_document_uses_section_defaults() {
        let t = Tuning::from_json(r#"{"snake":{"grid_width":12,"grid_height":12,"tick_ms":100,"start_length":4}}"#);
        assert_eq!(t.snake.grid_width, 12);
        assert_eq!(t.runner.tick_ms, RunnerTuning::default().tick_ms);
    }
}
