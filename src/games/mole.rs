//! Whack-a-Mole
//!
//! A countdown session over a fixed set of cells. Exactly one mole is up at
//! any moment; its visible duration is drawn uniformly from a range, and on
//! expiry the timer reschedules itself with a fresh random cell (possibly the
//! same one). This single-slot timer is separate from the session countdown.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::MoleTuning;
use crate::entity::EntityView;
use crate::input::InputEvent;
use crate::render::{RenderAdapter, Scene};
use crate::sched::Scheduler;
use crate::scores::{KvStore, MemoryStore, ScoreGateway};
use crate::session::{GameEvent, Session, TerminalReason};

/// Persistence key for the best score.
pub const STORAGE_KEY: &str = "mole.best";

/// Countdown granularity (ms).
const COUNTDOWN_STEP_MS: u64 = 1000;

/// Deferred work for this game, each fire tagged with its schedule-time
/// epoch so stale fires are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoleTimer {
    /// One-second session countdown step.
    Countdown { epoch: u32 },
    /// The active mole's visible duration elapsed.
    Expiry { epoch: u32 },
}

pub struct MoleGame<S: KvStore = MemoryStore> {
    tuning: MoleTuning,
    session: Session,
    /// Whacked flag per cell; meaningful only for the active cell.
    whacked: Vec<bool>,
    active: Option<usize>,
    remaining_ms: u64,
    rng: Pcg32,
    sched: Scheduler<MoleTimer>,
    epoch: u32,
    gateway: ScoreGateway<S>,
}

impl MoleGame<MemoryStore> {
    pub fn new(tuning: MoleTuning, seed: u64) -> Self {
        Self::with_store(tuning, seed, MemoryStore::new())
    }
}

impl<S: KvStore> MoleGame<S> {
    pub fn with_store(tuning: MoleTuning, seed: u64, store: S) -> Self {
        let cells = tuning.cells;
        Self {
            tuning,
            session: Session::new(),
            whacked: vec![false; cells],
            active: None,
            remaining_ms: 0,
            rng: Pcg32::seed_from_u64(seed),
            sched: Scheduler::new(),
            epoch: 0,
            gateway: ScoreGateway::new(store),
        }
    }

    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.remaining_ms = self.tuning.session_ms;
        self.whacked.fill(false);
        self.sched
            .schedule_every(COUNTDOWN_STEP_MS, MoleTimer::Countdown { epoch: self.epoch });
        self.activate_random();
        log::info!(
            "Whack-a-Mole session started ({} s)",
            self.tuning.session_ms / 1000
        );
        true
    }

    pub fn reset(&mut self) {
        self.sched.cancel_all();
        self.epoch = self.epoch.wrapping_add(1);
        self.session.reset();
        self.active = None;
        self.remaining_ms = 0;
        self.whacked.fill(false);
    }

    /// Pop a uniformly random mole and arm its expiry. The just-expired cell
    /// is a legal choice again.
    fn activate_random(&mut self) {
        let cell = self.rng.random_range(0..self.tuning.cells);
        let duration = self.draw_duration();
        self.whacked[cell] = false;
        self.active = Some(cell);
        self.sched
            .schedule_once(duration, MoleTimer::Expiry { epoch: self.epoch });
    }

    /// Uniform visible duration in [min_active_ms, max_active_ms).
    fn draw_duration(&mut self) -> u64 {
        self.rng
            .random_range(self.tuning.min_active_ms..self.tuning.max_active_ms)
    }

    pub fn handle(&mut self, input: InputEvent) -> Option<GameEvent> {
        match input {
            InputEvent::CellClick(cell) => self.whack(cell),
            _ => None,
        }
    }

    /// Click a cell. Scores only on the active, not-yet-whacked mole; every
    /// other click is ignored.
    pub fn whack(&mut self, cell: usize) -> Option<GameEvent> {
        if !self.session.is_running() || self.active != Some(cell) || self.whacked[cell] {
            return None;
        }
        self.whacked[cell] = true;
        self.session.add_score(1);
        Some(GameEvent::Scored {
            score: self.session.score(),
        })
    }

    pub fn advance(&mut self, dt_ms: u64, renderer: &mut dyn RenderAdapter) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for fire in self.sched.advance(dt_ms) {
            self.on_timer(fire.event, &mut events);
            if self.session.is_running() {
                renderer.render(&self.scene());
            }
        }
        events
    }

    fn on_timer(&mut self, timer: MoleTimer, events: &mut Vec<GameEvent>) {
        match timer {
            MoleTimer::Countdown { epoch } => {
                if epoch != self.epoch || !self.session.is_running() {
                    return;
                }
                self.session.ticks += 1;
                self.remaining_ms = self.remaining_ms.saturating_sub(COUNTDOWN_STEP_MS);
                if self.remaining_ms == 0 {
                    self.finish(events);
                }
            }
            MoleTimer::Expiry { epoch } => {
                if epoch != self.epoch || !self.session.is_running() {
                    return;
                }
                // Single-slot timer reschedules itself with a fresh draw.
                self.active = None;
                self.activate_random();
            }
        }
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        let score = self.session.score();
        self.session.finish(TerminalReason::Timeout);
        self.sched.cancel_all();
        self.active = None;
        log::info!("Whack-a-Mole time up, score {score}");
        if self.gateway.record(STORAGE_KEY, score) {
            events.push(GameEvent::HighScore { score });
        }
        events.push(GameEvent::GameOver {
            reason: TerminalReason::Timeout,
            score,
        });
    }

    pub fn scene(&self) -> Scene {
        let entities = (0..self.tuning.cells)
            .map(|cell| EntityView::Mole {
                cell,
                active: self.active == Some(cell),
                whacked: self.active == Some(cell) && self.whacked[cell],
            })
            .collect();

        Scene {
            entities,
            score: self.session.score(),
            ticks: self.session.ticks,
            remaining_ms: Some(self.remaining_ms),
            running: self.session.is_running(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn active_cell(&self) -> Option<usize> {
        self.active
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn high_score(&self) -> u32 {
        self.gateway.load(STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullRenderer;

    fn game() -> MoleGame {
        MoleGame::new(MoleTuning::default(), 1234)
    }

    #[test]
    fn test_exactly_one_active_mole() {
        let mut g = game();
        g.start();
        assert!(g.active_cell().is_some());

        // Step through plenty of expiries; the slot never empties or doubles.
        for _ in 0..50 {
            g.advance(100, &mut NullRenderer);
            if !g.session().is_running() {
                break;
            }
            let active = g
                .scene()
                .entities
                .iter()
                .filter(|e| matches!(e, EntityView::Mole { active: true, .. }))
                .count();
            assert_eq!(active, 1);
        }
    }

    #[test]
    fn test_duration_draws_are_uniform_in_range() {
        let mut g = game();
        let mut bins = [0u32; 3];
        for _ in 0..1000 {
            let d = g.draw_duration();
            assert!((600..1500).contains(&d));
            bins[((d - 600) / 300) as usize] += 1;
        }
        // Coarse uniformity: each 300 ms third near 333 of 1000.
        for &count in &bins {
            assert!((270..=400).contains(&count), "skewed bin: {bins:?}");
        }
    }

    #[test]
    fn test_whack_scores_once_per_activation() {
        let mut g = game();
        g.start();
        let cell = g.active_cell().unwrap();

        assert!(matches!(
            g.whack(cell),
            Some(GameEvent::Scored { score: 1 })
        ));
        // Same activation, second hit is ignored.
        assert!(g.whack(cell).is_none());
        assert_eq!(g.session().score(), 1);

        // Clicking any other cell is ignored too.
        let other = (cell + 1) % 9;
        assert!(g.whack(other).is_none());
    }

    #[test]
    fn test_countdown_reaches_timeout() {
        let mut g = MoleGame::new(
            MoleTuning {
                session_ms: 3000,
                ..Default::default()
            },
            5,
        );
        g.start();
        g.whack(g.active_cell().unwrap());

        let mut all = Vec::new();
        for _ in 0..4 {
            all.extend(g.advance(1000, &mut NullRenderer));
        }

        assert!(all.iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                reason: TerminalReason::Timeout,
                score: 1,
            }
        )));
        assert!(!g.session().is_running());
        assert_eq!(g.high_score(), 1);
        // Expired session left no armed timers behind.
        assert_eq!(g.sched.pending(), 0);
    }

    #[test]
    fn test_stale_expiry_after_reset() {
        let mut g = game();
        g.start();
        let stale = MoleTimer::Expiry { epoch: g.epoch };

        g.reset();
        let mut events = Vec::new();
        g.on_timer(stale, &mut events);

        assert!(events.is_empty());
        assert_eq!(g.active_cell(), None);
        assert_eq!(g.session().score(), 0);
    }

    #[test]
    fn test_whack_ignored_while_stopped() {
        let mut g = game();
        assert!(g.whack(0).is_none());
        assert_eq!(g.session().score(), 0);
    }
}
