//! Render adapter seam
//!
//! The simulation never touches a presentation surface. Each tick produces an
//! immutable [`Scene`] snapshot; an embedder-supplied [`RenderAdapter`] draws
//! it. Headless tests pass [`NullRenderer`].

use serde::{Deserialize, Serialize};

use crate::entity::EntityView;

/// Snapshot of everything drawable after one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub entities: Vec<EntityView>,
    pub score: u32,
    pub ticks: u64,
    /// Countdown games only.
    pub remaining_ms: Option<u64>,
    pub running: bool,
}

/// External drawing collaborator. Called once per tick after the state
/// update; must not feed anything back into the simulation.
pub trait RenderAdapter {
    fn render(&mut self, scene: &Scene);
}

/// Discards every scene. Used for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl RenderAdapter for NullRenderer {
    fn render(&mut self, _scene: &Scene) {}
}

/// Logs a one-line summary per frame at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceRenderer;

impl RenderAdapter for TraceRenderer {
    fn render(&mut self, scene: &Scene) {
        log::trace!(
            "frame tick={} score={} entities={}",
            scene.ticks,
            scene.score,
            scene.entities.len()
        );
    }
}

/// Records scene summaries so tests can assert render cadence.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Scene>,
}

impl RenderAdapter for RecordingRenderer {
    fn render(&mut self, scene: &Scene) {
        self.frames.push(scene.clone());
    }
}
