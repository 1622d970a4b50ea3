//! Virtual-time task scheduler
//!
//! Single-threaded replacement for interval/timeout timers. Tasks carry plain
//! event values instead of closures so the owning controller dispatches fires
//! itself and can check session liveness before mutating anything. Time only
//! moves when the embedder calls [`Scheduler::advance`], which keeps every
//! game fully deterministic and testable.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Handle for a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// How a task re-arms after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(u64),
}

/// A delivered task firing.
#[derive(Debug, Clone)]
pub struct Fire<E> {
    /// The task that fired.
    pub task: TaskId,
    /// Virtual time (ms) at which the deadline elapsed.
    pub at_ms: u64,
    /// The event value supplied at schedule time.
    pub event: E,
}

/// Heap entry. Ordered by deadline, then by schedule sequence so tasks
/// scheduled earlier fire first on deadline ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due_ms: u64,
    seq: u64,
    id: TaskId,
}

struct Task<E> {
    event: E,
    repeat: Repeat,
}

/// Deterministic single-threaded timer service.
///
/// Cancelled tasks never fire, even if their deadline already passed before
/// the cancel. Repeating tasks fire once per elapsed period, in deadline
/// order interleaved with other due tasks.
pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    heap: BinaryHeap<Reverse<Entry>>,
    tasks: HashMap<TaskId, Task<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            next_seq: 0,
            heap: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live (scheduled, uncancelled) tasks.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Schedule a one-shot task `delay_ms` from now.
    pub fn schedule_once(&mut self, delay_ms: u64, event: E) -> TaskId {
        self.push(delay_ms, Repeat::Once, event)
    }

    /// Schedule a repeating task firing every `interval_ms` (minimum 1 ms).
    pub fn schedule_every(&mut self, interval_ms: u64, event: E) -> TaskId {
        let interval = interval_ms.max(1);
        self.push(interval, Repeat::Every(interval), event)
    }

    fn push(&mut self, delay_ms: u64, repeat: Repeat, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(id, Task { event, repeat });
        self.push_entry(id, self.now_ms + delay_ms);
        id
    }

    fn push_entry(&mut self, id: TaskId, due_ms: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due_ms, seq, id }));
    }

    /// Cancel a task. Returns whether it was still live.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        // Heap entry stays behind as a tombstone; advance() skips it.
        self.tasks.remove(&id).is_some()
    }

    /// Cancel every outstanding task.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
        self.heap.clear();
    }

    /// Whether the task is still live.
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }
}

impl<E: Clone> Scheduler<E> {
    /// Advance virtual time by `dt_ms` and collect every fire that came due,
    /// in deadline order. Repeating tasks that lapped more than one period
    /// produce one fire per period.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<Fire<E>> {
        self.now_ms += dt_ms;
        let mut fires = Vec::new();

        while let Some(&Reverse(entry)) = self.heap.peek() {
            if entry.due_ms > self.now_ms {
                break;
            }
            self.heap.pop();

            let Some(task) = self.tasks.get(&entry.id) else {
                continue; // cancelled tombstone
            };

            fires.push(Fire {
                task: entry.id,
                at_ms: entry.due_ms,
                event: task.event.clone(),
            });

            match task.repeat {
                Repeat::Once => {
                    self.tasks.remove(&entry.id);
                }
                Repeat::Every(interval) => {
                    self.push_entry(entry.id, entry.due_ms + interval);
                }
            }
        }

        fires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        sched.schedule_once(50, "beep");

        assert!(sched.advance(49).is_empty());
        let fires = sched.advance(1);
        assert_eq!(fires.len(), 1);
        assert_eq!(fires[0].event, "beep");
        assert_eq!(fires[0].at_ms, 50);

        // Never again.
        assert!(sched.advance(1000).is_empty());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_interval_fires_per_period() {
        let mut sched: Scheduler<u32> = Scheduler::new();
        sched.schedule_every(30, 7);

        // 100 ms covers deadlines at 30, 60, 90.
        let fires = sched.advance(100);
        assert_eq!(fires.len(), 3);
        assert_eq!(
            fires.iter().map(|f| f.at_ms).collect::<Vec<_>>(),
            vec![30, 60, 90]
        );
    }

    #[test]
    fn test_deadline_order_across_tasks() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        sched.schedule_once(40, "late");
        sched.schedule_every(15, "tick");

        let fires = sched.advance(45);
        let events: Vec<_> = fires.iter().map(|f| f.event).collect();
        assert_eq!(events, vec!["tick", "tick", "late", "tick"]);
    }

    #[test]
    fn test_cancel_prevents_due_fire() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        let id = sched.schedule_once(10, "stale");

        // Cancel after the deadline would have passed but before delivery.
        assert!(sched.cancel(id));
        assert!(sched.advance(20).is_empty());
        assert!(!sched.is_scheduled(id));
    }

    #[test]
    fn test_cancel_all() {
        let mut sched: Scheduler<u8> = Scheduler::new();
        sched.schedule_every(5, 1);
        sched.schedule_once(7, 2);
        sched.cancel_all();
        assert_eq!(sched.pending(), 0);
        assert!(sched.advance(100).is_empty());
    }

    #[test]
    fn test_tie_break_is_schedule_order() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        sched.schedule_once(20, "first");
        sched.schedule_once(20, "second");

        let fires = sched.advance(20);
        assert_eq!(fires[0].event, "first");
        assert_eq!(fires[1].event, "second");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// One-shots fire exactly once, at their deadline, never early,
            /// regardless of how time is chopped up.
            #[test]
            fn prop_one_shots_fire_exactly_on_time(
                delays in prop::collection::vec(1u64..400, 1..20),
                step in 1u64..50,
            ) {
                let mut sched: Scheduler<usize> = Scheduler::new();
                for (i, &d) in delays.iter().enumerate() {
                    sched.schedule_once(d, i);
                }

                let mut fired = 0;
                while sched.pending() > 0 {
                    for fire in sched.advance(step) {
                        prop_assert!(fire.at_ms <= sched.now_ms());
                        prop_assert_eq!(fire.at_ms, delays[fire.event]);
                        fired += 1;
                    }
                }
                prop_assert_eq!(fired, delays.len());
            }
        }
    }
}
