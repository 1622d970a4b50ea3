//! Endless Runner
//!
//! Fixed-tick side scroller. The player holds a fixed x and jumps over
//! obstacles scrolling in from the right; clouds scroll behind as decoration.
//! Spawn pacing tightens on a coarse tick threshold, floored at a minimum.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::RunnerTuning;
use crate::entity::{Aabb, EntityView};
use crate::input::InputEvent;
use crate::render::{RenderAdapter, Scene};
use crate::sched::Scheduler;
use crate::scores::{KvStore, MemoryStore, ScoreGateway};
use crate::session::{GameEvent, Session, TerminalReason};

/// Persistence key for the best score.
pub const STORAGE_KEY: &str = "runner.best";

/// Tick timer payload carrying its schedule-time epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTimer {
    pub epoch: u32,
}

/// A scrolling entity (obstacle or background cloud).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scroller {
    pub id: u32,
    pub body: Aabb,
    /// Horizontal displacement per tick (negative = leftward).
    pub speed: f32,
}

/// The jumping player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Aabb,
    pub vel_y: f32,
    pub grounded: bool,
}

pub struct RunnerGame<S: KvStore = MemoryStore> {
    tuning: RunnerTuning,
    session: Session,
    player: Player,
    obstacles: Vec<Scroller>,
    clouds: Vec<Scroller>,
    /// Current obstacle spawn interval in ticks; shrinks as the run goes on.
    spawn_ticks: u64,
    next_id: u32,
    sched: Scheduler<TickTimer>,
    epoch: u32,
    gateway: ScoreGateway<S>,
}

impl RunnerGame<MemoryStore> {
    pub fn new(tuning: RunnerTuning) -> Self {
        Self::with_store(tuning, MemoryStore::new())
    }
}

impl<S: KvStore> RunnerGame<S> {
    pub fn with_store(tuning: RunnerTuning, store: S) -> Self {
        let player = Self::spawn_player(&tuning);
        let spawn_ticks = tuning.obstacle_spawn_ticks;
        Self {
            tuning,
            session: Session::new(),
            player,
            obstacles: Vec::new(),
            clouds: Vec::new(),
            spawn_ticks,
            next_id: 1,
            sched: Scheduler::new(),
            epoch: 0,
            gateway: ScoreGateway::new(store),
        }
    }

    fn spawn_player(tuning: &RunnerTuning) -> Player {
        let (w, h) = tuning.player_size;
        Player {
            body: Aabb::new(Vec2::new(60.0, tuning.ground_y - h), Vec2::new(w, h)),
            vel_y: 0.0,
            grounded: true,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.player = Self::spawn_player(&self.tuning);
        self.obstacles.clear();
        self.clouds.clear();
        self.spawn_ticks = self.tuning.obstacle_spawn_ticks;
        self.sched
            .schedule_every(self.tuning.tick_ms, TickTimer { epoch: self.epoch });
        log::info!("Runner session started ({} ms/tick)", self.tuning.tick_ms);
        true
    }

    pub fn reset(&mut self) {
        self.sched.cancel_all();
        self.epoch = self.epoch.wrapping_add(1);
        self.session.reset();
        self.player = Self::spawn_player(&self.tuning);
        self.obstacles.clear();
        self.clouds.clear();
        self.spawn_ticks = self.tuning.obstacle_spawn_ticks;
    }

    pub fn handle(&mut self, input: InputEvent) {
        if matches!(input, InputEvent::Jump) {
            self.jump();
        }
    }

    /// Jump trigger. Only effective while grounded and running.
    pub fn jump(&mut self) {
        if self.session.is_running() && self.player.grounded {
            self.player.vel_y = self.tuning.jump_velocity;
            self.player.grounded = false;
        }
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

    fn on_timer(&mut self, timer: TickTimer, events: &mut Vec<GameEvent>) {
        if timer.epoch != self.epoch || !self.session.is_running() {
            return;
        }
        self.step(events);
    }

    fn step(&mut self, events: &mut Vec<GameEvent>) {
        self.session.ticks += 1;
        let tick = self.session.ticks;

        // Gravity-integrated jump: velocity then position, clamp at ground.
        if !self.player.grounded {
            self.player.vel_y += self.tuning.gravity;
            self.player.body.pos.y += self.player.vel_y;
            let ground_top = self.tuning.ground_y - self.player.body.size.y;
            if self.player.body.pos.y >= ground_top {
                self.player.body.pos.y = ground_top;
                self.player.vel_y = 0.0;
                self.player.grounded = true;
            }
        }

        // Linear translation at each entity's constant speed.
        for s in self.obstacles.iter_mut().chain(self.clouds.iter_mut()) {
            s.body.pos.x += s.speed;
        }

        // Drop entities fully past the left bound, order preserved.
        self.obstacles.retain(|s| s.body.right() > 0.0);
        self.clouds.retain(|s| s.body.right() > 0.0);

        // Spawn on the tick-counter modulo.
        if tick % self.spawn_ticks == 0 {
            let id = self.next_entity_id();
            let (w, h) = self.tuning.obstacle_size;
            self.obstacles.push(Scroller {
                id,
                body: Aabb::new(
                    Vec2::new(self.tuning.field_width, self.tuning.ground_y - h),
                    Vec2::new(w, h),
                ),
                speed: -self.tuning.scroll_speed,
            });
        }
        if tick % self.tuning.cloud_spawn_ticks == 0 {
            let id = self.next_entity_id();
            let (w, h) = self.tuning.cloud_size;
            // Clouds drift at half speed, staggered heights off the id.
            let y = 40.0 + (id % 5) as f32 * 25.0;
            self.clouds.push(Scroller {
                id,
                body: Aabb::new(Vec2::new(self.tuning.field_width, y), Vec2::new(w, h)),
                speed: -self.tuning.scroll_speed * 0.5,
            });
        }

        // Difficulty ramp on a coarser threshold, floored.
        if tick % self.tuning.ramp_every_ticks == 0
            && self.spawn_ticks > self.tuning.min_obstacle_spawn_ticks
        {
            self.spawn_ticks -= 1;
            log::debug!("Runner spawn interval tightened to {} ticks", self.spawn_ticks);
        }

        // Terminal: AABB overlap with any obstacle.
        if self
            .obstacles
            .iter()
            .any(|o| o.body.intersects(&self.player.body))
        {
            self.finish(events);
            return;
        }

        // Survival scoring, one point per tick.
        self.session.add_score(1);
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        let score = self.session.score();
        self.session.finish(TerminalReason::ObstacleCollision);
        self.sched.cancel_all();
        log::info!("Runner session over at {score}");
        if self.gateway.record(STORAGE_KEY, score) {
            events.push(GameEvent::HighScore { score });
        }
        events.push(GameEvent::GameOver {
            reason: TerminalReason::ObstacleCollision,
            score,
        });
    }

    pub fn scene(&self) -> Scene {
        let mut entities = vec![EntityView::Player {
            body: self.player.body,
            grounded: self.player.grounded,
        }];
        entities.extend(
            self.clouds
                .iter()
                .map(|c| EntityView::Cloud { body: c.body }),
        );
        entities.extend(
            self.obstacles
                .iter()
                .map(|o| EntityView::Obstacle { body: o.body }),
        );

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

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Scroller] {
        &self.obstacles
    }

    pub fn high_score(&self) -> u32 {
        self.gateway.load(STORAGE_KEY)
    }
}
