//! Memory Match
//!
//! Pair-matching card game. The deck gets an unbiased Fisher-Yates shuffle
//! (the slice `shuffle` from `rand`), replacing the comparator-based shuffle
//! the DOM version used. A mismatched pair stays visible for a fixed delay
//! before flipping back; that delay is a cancellable one-shot task, so a
//! reset mid-delay leaves no stray flip behind.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use crate::config::MemoryTuning;
use crate::entity::{CardFace, EntityView};
use crate::input::InputEvent;
use crate::render::{RenderAdapter, Scene};
use crate::sched::Scheduler;
use crate::session::{GameEvent, Session, TerminalReason};

/// Flip-back of a mismatched pair, armed when the second card is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipBack {
    pub epoch: u32,
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone, Copy)]
struct Card {
    pair: u8,
    face: CardFace,
}

pub struct MemoryGame {
    tuning: MemoryTuning,
    session: Session,
    cards: Vec<Card>,
    /// First card of the pair currently being revealed.
    first: Option<usize>,
    /// True while a mismatched pair is on display; clicks are ignored.
    busy: bool,
    /// Completed reveal attempts (pairs turned over).
    moves: u32,
    rng: Pcg32,
    sched: Scheduler<FlipBack>,
    epoch: u32,
}

impl MemoryGame {
    pub fn new(tuning: MemoryTuning, seed: u64) -> Self {
        let mut game = Self {
            tuning,
            session: Session::new(),
            cards: Vec::new(),
            first: None,
            busy: false,
            moves: 0,
            rng: Pcg32::seed_from_u64(seed),
            sched: Scheduler::new(),
            epoch: 0,
        };
        game.deal();
        game
    }

    /// Build and shuffle a fresh face-down deck.
    fn deal(&mut self) {
        self.cards.clear();
        for pair in 0..self.tuning.pairs {
            for _ in 0..2 {
                self.cards.push(Card {
                    pair,
                    face: CardFace::Hidden,
                });
            }
        }
        self.cards.shuffle(&mut self.rng);
        self.first = None;
        self.busy = false;
        self.moves = 0;
    }

    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.deal();
        log::info!("Memory session started ({} pairs)", self.tuning.pairs);
        true
    }

    pub fn reset(&mut self) {
        self.sched.cancel_all();
        self.epoch = self.epoch.wrapping_add(1);
        self.session.reset();
        self.deal();
    }

    pub fn handle(&mut self, input: InputEvent) -> Vec<GameEvent> {
        match input {
            InputEvent::CellClick(index) => self.click(index),
            _ => Vec::new(),
        }
    }

    /// Reveal a card. Clicks during the mismatch delay, on face-up cards, or
    /// outside the deck are silently ignored.
    pub fn click(&mut self, index: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.session.is_running() || self.busy || index >= self.cards.len() {
            return events;
        }
        if self.cards[index].face != CardFace::Hidden {
            return events;
        }

        self.cards[index].face = CardFace::Revealed;

        let Some(first) = self.first.take() else {
            self.first = Some(index);
            return events;
        };

        self.moves += 1;
        if self.cards[first].pair == self.cards[index].pair {
            self.cards[first].face = CardFace::Solved;
            self.cards[index].face = CardFace::Solved;
            self.session.add_score(1);
            events.push(GameEvent::Scored {
                score: self.session.score(),
            });

            if self.cards.iter().all(|c| c.face == CardFace::Solved) {
                let score = self.session.score();
                self.session.finish(TerminalReason::Cleared);
                self.sched.cancel_all();
                log::info!("Memory cleared in {} moves", self.moves);
                events.push(GameEvent::GameOver {
                    reason: TerminalReason::Cleared,
                    score,
                });
            }
        } else {
            // Leave both visible for the reveal delay, then flip back.
            self.busy = true;
            self.sched.schedule_once(
                self.tuning.reveal_delay_ms,
                FlipBack {
                    epoch: self.epoch,
                    a: first,
                    b: index,
                },
            );
        }
        events
    }

    pub fn advance(&mut self, dt_ms: u64, renderer: &mut dyn RenderAdapter) -> Vec<GameEvent> {
        for fire in self.sched.advance(dt_ms) {
            self.on_timer(fire.event);
            if self.session.is_running() {
                renderer.render(&self.scene());
            }
        }
        Vec::new()
    }

    fn on_timer(&mut self, flip: FlipBack) {
        if flip.epoch != self.epoch || !self.session.is_running() {
            return;
        }
        self.cards[flip.a].face = CardFace::Hidden;
        self.cards[flip.b].face = CardFace::Hidden;
        self.busy = false;
    }

    pub fn scene(&self) -> Scene {
        let entities = self
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| EntityView::Card {
                index,
                // Hidden cards do not leak their pair key to the renderer.
                pair: if card.face == CardFace::Hidden {
                    0
                } else {
                    card.pair
                },
                face: card.face,
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

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn solved_pairs(&self) -> u32 {
        self.session.score()
    }
}
