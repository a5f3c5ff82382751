//! Typewriter sequencing: a timer-driven prefix of one or more phrases, optionally rendered
//! through the fuzzy text effect.

mod config;
mod driver;
mod fuzzy;
mod state;

pub use config::{FuzzyTypewriterConfig, Phrases, TypewriterConfig, VariableSpeed};
pub use driver::TypewriterDriver;
pub use fuzzy::FuzzyTypewriter;
pub use state::{NextTick, PhraseCompleted, Step, TypingPhase, TypingState};
