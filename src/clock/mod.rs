//! Injected timing sources: per-refresh frame callbacks and one-shot timers.

mod frame;
mod timer;

pub use frame::{FrameRequestId, FrameScheduler, ManualFrameClock};
pub use timer::{ManualTimers, TimerId, TimerQueue};
