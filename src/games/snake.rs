//! Snake
//!
//! Discrete grid movement on a fixed tick. Steering input is buffered for
//! one tick; a turn equal to the inverse of the current heading is rejected
//! outright so the snake can never reverse into itself mid-tick.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::SnakeTuning;
use crate::entity::{Direction, EntityView, GridPos};
use crate::input::InputEvent;
use crate::render::{RenderAdapter, Scene};
use crate::sched::Scheduler;
use crate::scores::{KvStore, MemoryStore, ScoreGateway};
use crate::session::{GameEvent, Session, TerminalReason};

/// Persistence key for the best score.
pub const STORAGE_KEY: &str = "snake.best";

/// Tick timer payload. The epoch is captured at schedule time; a fire whose
/// epoch no longer matches the controller's is stale and must do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTimer {
    pub epoch: u32,
}

/// One snake game instance.
pub struct SnakeGame<S: KvStore = MemoryStore> {
    tuning: SnakeTuning,
    session: Session,
    /// Ordered segments, head first.
    body: VecDeque<GridPos>,
    dir: Direction,
    /// First legal direction change received since the last tick.
    queued: Option<Direction>,
    food: GridPos,
    rng: Pcg32,
    sched: Scheduler<TickTimer>,
    epoch: u32,
    gateway: ScoreGateway<S>,
}

impl SnakeGame<MemoryStore> {
    pub fn new(tuning: SnakeTuning, seed: u64) -> Self {
        Self::with_store(tuning, seed, MemoryStore::new())
    }
}

impl<S: KvStore> SnakeGame<S> {
    pub fn with_store(tuning: SnakeTuning, seed: u64, store: S) -> Self {
        let mut game = Self {
            tuning,
            session: Session::new(),
            body: VecDeque::new(),
            dir: Direction::Right,
            queued: None,
            food: GridPos::new(0, 0),
            rng: Pcg32::seed_from_u64(seed),
            sched: Scheduler::new(),
            epoch: 0,
            gateway: ScoreGateway::new(store),
        };
        game.init_board();
        game
    }

    fn init_board(&mut self) {
        let cx = self.tuning.grid_width / 2;
        let cy = self.tuning.grid_height / 2;
        self.body.clear();
        for i in 0..self.tuning.start_length as i32 {
            self.body.push_back(GridPos::new(cx - i, cy));
        }
        self.dir = Direction::Right;
        self.queued = None;
        self.food = self.spawn_food();
    }

    /// Uniform rejection sampling over cells not occupied by the snake.
    fn spawn_food(&mut self) -> GridPos {
        loop {
            let cell = GridPos::new(
                self.rng.random_range(0..self.tuning.grid_width),
                self.rng.random_range(0..self.tuning.grid_height),
            );
            if !self.body.contains(&cell) {
                return cell;
            }
        }
    }

    /// Begin a session. No-op while one is already running.
    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.init_board();
        self.sched
            .schedule_every(self.tuning.tick_ms, TickTimer { epoch: self.epoch });
        log::info!("Snake session started ({} ms/tick)", self.tuning.tick_ms);
        true
    }

    /// Stop and clear. Cancels every outstanding timer so a late fire cannot
    /// touch the fresh state; idempotent while stopped.
    pub fn reset(&mut self) {
        self.sched.cancel_all();
        self.epoch = self.epoch.wrapping_add(1);
        self.session.reset();
        self.init_board();
    }

    /// Feed an input event. Everything but steering is ignored.
    pub fn handle(&mut self, input: InputEvent) {
        if let InputEvent::Turn(dir) = input {
            self.queue_turn(dir);
        }
    }

    /// Queue a direction change for the next tick. Reversals are rejected
    /// against the current heading; only the first legal change per tick
    /// window is kept.
    pub fn queue_turn(&mut self, dir: Direction) {
        if !self.session.is_running() || self.queued.is_some() {
            return;
        }
        if dir.is_opposite(self.dir) {
            return;
        }
        self.queued = Some(dir);
    }

    /// Advance virtual time, applying due ticks and rendering one frame per
    /// applied tick while the session stays live.
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

    fn on_timer(&mut self, timer: TickTimer, events: &mut Vec<GameEvent>) {
        // Liveness guard: stale fires from a previous session are no-ops.
        if timer.epoch != self.epoch || !self.session.is_running() {
            return;
        }
        self.step(events);
    }

    fn step(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(dir) = self.queued.take() {
            self.dir = dir;
        }

        let head = self.body[0];
        let new_head = head.step(self.dir);

        if !new_head.in_bounds(self.tuning.grid_width, self.tuning.grid_height) {
            self.finish(TerminalReason::WallCollision, events);
            return;
        }
        if self.body.contains(&new_head) {
            self.finish(TerminalReason::SelfCollision, events);
            return;
        }

        let ate = new_head == self.food;
        self.body.push_front(new_head);
        if ate {
            self.session.add_score(1);
            self.food = self.spawn_food();
            events.push(GameEvent::Scored {
                score: self.session.score(),
            });
        } else {
            self.body.pop_back();
        }

        self.session.ticks += 1;
    }

    fn finish(&mut self, reason: TerminalReason, events: &mut Vec<GameEvent>) {
        let score = self.session.score();
        self.session.finish(reason);
        self.sched.cancel_all();
        log::info!("Snake session over: {reason:?}, score {score}");
        if self.gateway.record(STORAGE_KEY, score) {
            events.push(GameEvent::HighScore { score });
        }
        events.push(GameEvent::GameOver { reason, score });
    }

    /// Drawable snapshot of the current state.
    pub fn scene(&self) -> Scene {
        let mut entities: Vec<EntityView> = self
            .body
            .iter()
            .enumerate()
            .map(|(i, &cell)| EntityView::SnakeSegment { cell, head: i == 0 })
            .collect();
        entities.push(EntityView::Food { cell: self.food });

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

    pub fn high_score(&self) -> u32 {
        self.gateway.load(STORAGE_KEY)
    }

    pub fn head(&self) -> GridPos {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn food(&self) -> GridPos {
        self.food
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
