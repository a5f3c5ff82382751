use std::time::Duration;

use crate::clock::{TimerId, TimerQueue};
use crate::foundation::error::FxResult;
use crate::foundation::math::{Rng64, UniformSource};
use crate::typewriter::config::TypewriterConfig;
use crate::typewriter::state::{NextTick, TypingState};

const DEFAULT_SEED: u64 = 0x7E57_7E57;

/// Drives a [`TypingState`] from one-shot timers.
///
/// At most one timer is outstanding; deliveries for any other handle are ignored, so a torn
/// down or reconfigured driver never double-fires.
pub struct TypewriterDriver {
    config: TypewriterConfig,
    state: TypingState,
    timer: Option<TimerId>,
    armed: bool,
    started: bool,
    visible: bool,
    on_phrase_complete: Option<Box<dyn FnMut(&str, usize)>>,
    rng: Box<dyn UniformSource>,
}

impl std::fmt::Debug for TypewriterDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypewriterDriver")
            .field("state", &self.state)
            .field("timer", &self.timer)
            .field("armed", &self.armed)
            .field("started", &self.started)
            .field("visible", &self.visible)
            .finish()
    }
}

impl TypewriterDriver {
    pub fn new(config: TypewriterConfig) -> FxResult<Self> {
        config.validate()?;
        let state = initial_state(&config);
        Ok(Self {
            config,
            state,
            timer: None,
            armed: false,
            started: false,
            visible: false,
            on_phrase_complete: None,
            rng: Box::new(Rng64::new(DEFAULT_SEED)),
        })
    }

    /// Replace the source used for variable typing speed.
    pub fn with_rng(mut self, rng: impl UniformSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Register the phrase-completed notification `(text, index)`.
    pub fn on_phrase_complete(&mut self, f: impl FnMut(&str, usize) + 'static) {
        self.on_phrase_complete = Some(Box::new(f));
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    /// Begin the sequence, or hold it until [`Self::set_visible`] when `start_on_visible` is set.
    ///
    /// Returns whether the first tick was scheduled.
    pub fn start(&mut self, timers: &mut dyn TimerQueue) -> bool {
        self.armed = true;
        self.try_start(timers)
    }

    /// Visibility report from the host. Only gates the first start.
    pub fn set_visible(&mut self, visible: bool, timers: &mut dyn TimerQueue) -> bool {
        self.visible = visible;
        self.try_start(timers)
    }

    /// Apply new options: cancel the outstanding timer and restart from the first phrase.
    pub fn reconfigure(
        &mut self,
        config: TypewriterConfig,
        timers: &mut dyn TimerQueue,
    ) -> FxResult<()> {
        config.validate()?;
        self.cancel(timers);
        self.state = initial_state(&config);
        self.config = config;
        self.started = false;
        self.try_start(timers);
        Ok(())
    }

    /// Service a timer delivery. Returns `true` when the displayed text may have changed.
    pub fn on_timer(&mut self, id: TimerId, timers: &mut dyn TimerQueue) -> bool {
        if self.timer != Some(id) {
            return false;
        }
        self.timer = None;

        let step = self.state.step();
        if let Some(done) = &step.completed {
            tracing::debug!(index = done.index, text = %done.text, "phrase completed");
            if let Some(cb) = self.on_phrase_complete.as_mut() {
                cb(&done.text, done.index);
            }
        }
        match step.next {
            Some(next) => self.schedule(next, timers),
            None => tracing::debug!("typewriter finished"),
        }
        true
    }

    /// Cancel the outstanding timer; later deliveries are ignored. Idempotent.
    pub fn teardown(&mut self, timers: &mut dyn TimerQueue) {
        self.cancel(timers);
        self.armed = false;
    }

    pub fn displayed(&self) -> &str {
        self.state.displayed()
    }

    pub fn state(&self) -> &TypingState {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }

    fn try_start(&mut self, timers: &mut dyn TimerQueue) -> bool {
        if !self.armed || self.started {
            return false;
        }
        if self.config.start_on_visible && !self.visible {
            tracing::trace!("typewriter waiting for visibility");
            return false;
        }
        self.started = true;
        if self.state.first_tick().is_none() {
            return false;
        }
        self.timer = Some(timers.schedule(self.config.initial_delay()));
        true
    }

    fn schedule(&mut self, next: NextTick, timers: &mut dyn TimerQueue) {
        let delay = self.delay_for(next);
        self.timer = Some(timers.schedule(delay));
    }

    fn delay_for(&mut self, next: NextTick) -> Duration {
        match next {
            NextTick::Type => {
                let u = self.rng.next_unit();
                self.config.typing_delay(u)
            }
            NextTick::Delete => self.config.deleting_speed(),
            NextTick::Pause => self.config.pause(),
        }
    }

    fn cancel(&mut self, timers: &mut dyn TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
    }
}

fn initial_state(config: &TypewriterConfig) -> TypingState {
    TypingState::new(config.phrases(), config.looping, config.reverse_mode)
}

#[cfg(test)]
#[path = "../../tests/unit/typewriter/driver.rs"]
mod tests;
