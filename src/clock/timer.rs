use std::time::Duration;

/// Handle of one scheduled one-shot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// One-shot timer service used by the typewriter driver.
pub trait TimerQueue {
    /// Schedule a single delivery after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Withdraw a pending timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Virtual-time timer queue advanced explicitly by the host.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    queue: Vec<(Duration, TimerId)>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop the earliest timer, jumping virtual time to its deadline.
    pub fn pop_next(&mut self) -> Option<TimerId> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|(_, (deadline, id))| (*deadline, *id))
            .map(|(i, _)| i)?;
        let (deadline, id) = self.queue.remove(idx);
        self.now = self.now.max(deadline);
        Some(id)
    }
}

impl TimerQueue for ManualTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.queue.push((self.now + delay, id));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|(_, t)| *t != id);
    }
}
