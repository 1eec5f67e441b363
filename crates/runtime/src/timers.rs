//! Deterministic cancellable timers.
//!
//! Every scheduled callback in the engine (highlight reverts, arc spawn
//! intervals, resume-rotation cooldowns) is an explicit entry here, owned
//! by the component that scheduled it. Dropping the queue drops the tasks,
//! so nothing can fire against freed state.

use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq)]
enum Repeat {
    Once,
    Every(f64),
}

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: Time,
    repeat: Repeat,
    payload: T,
    canceled: bool,
}

/// Vec-backed timer queue with a total firing order of `(due, id)`.
///
/// Key properties:
/// - Equal deadlines fire in scheduling order.
/// - Cancellation does not perturb the order of remaining timers.
/// - A repeating timer that fell several periods behind fires once per
///   missed period, keeping interval-driven spawners frame-rate immune.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.canceled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Schedule a one-shot timer at an absolute deadline.
    pub fn schedule_at(&mut self, due: Time, payload: T) -> TimerId {
        self.push(due, Repeat::Once, payload)
    }

    /// Schedule a one-shot timer `delay_s` from `now`.
    pub fn schedule_in(&mut self, now: Time, delay_s: f64, payload: T) -> TimerId {
        self.push(now + delay_s.max(0.0), Repeat::Once, payload)
    }

    /// Schedule a repeating timer; first fire is one interval from `now`.
    pub fn schedule_every(&mut self, now: Time, interval_s: f64, payload: T) -> TimerId {
        let interval_s = interval_s.max(1e-9);
        self.push(now + interval_s, Repeat::Every(interval_s), payload)
    }

    /// Cancel a pending timer.
    ///
    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        for entry in &mut self.entries {
            if entry.id == id && !entry.canceled {
                entry.canceled = true;
                return true;
            }
        }
        false
    }

    /// Drop all pending timers.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, due: Time, repeat: Repeat, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            due,
            repeat,
            payload,
            canceled: false,
        });
        id
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Fire everything due at or before `now`, in `(due, id)` order.
    pub fn fire_due(&mut self, now: Time) -> Vec<(TimerId, T)> {
        let mut fired: Vec<(Time, TimerId, T)> = Vec::new();

        for entry in &mut self.entries {
            if entry.canceled {
                continue;
            }
            match entry.repeat {
                Repeat::Once => {
                    if entry.due <= now {
                        fired.push((entry.due, entry.id, entry.payload.clone()));
                        entry.canceled = true;
                    }
                }
                Repeat::Every(interval_s) => {
                    while entry.due <= now {
                        fired.push((entry.due, entry.id, entry.payload.clone()));
                        entry.due = entry.due + interval_s;
                    }
                }
            }
        }

        self.entries.retain(|e| !e.canceled);

        fired.sort_by(|(da, ia, _), (db, ib, _)| {
            foundation::math::stable_total_cmp_f64(da.0, db.0).then_with(|| ia.cmp(ib))
        });
        fired.into_iter().map(|(_, id, payload)| (id, payload)).collect()
    }
}
