/// Where the typewriter is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    PauseBeforeDelete,
    Deleting,
    PauseBeforeType,
    Done,
}

/// Which delay the next tick waits for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextTick {
    Type,
    Delete,
    Pause,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseCompleted {
    pub text: String,
    pub index: usize,
}

/// Result of one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Step {
    pub completed: Option<PhraseCompleted>,
    /// `None` once the sequence is finished.
    pub next: Option<NextTick>,
}

/// Timer-free typing/deleting state machine over a list of phrases.
///
/// Forward mode types each phrase, reports it, pauses, deletes it and moves on. Reverse mode
/// starts with the phrase shown, deletes it, reports it, pauses and types the next one back.
/// Without looping the sequence stops after the last phrase is reported.
#[derive(Clone, Debug)]
pub struct TypingState {
    phrases: Vec<String>,
    index: usize,
    shown: usize,
    phase: TypingPhase,
    looping: bool,
    reverse: bool,
}

impl TypingState {
    pub fn new(phrases: Vec<String>, looping: bool, reverse: bool) -> Self {
        let (shown, phase) = match phrases.first() {
            None => (0, TypingPhase::Done),
            Some(first) if reverse => (first.chars().count(), TypingPhase::Deleting),
            Some(_) => (0, TypingPhase::Typing),
        };
        Self {
            phrases,
            index: 0,
            shown,
            phase,
            looping,
            reverse,
        }
    }

    /// The tick kind that should follow the initial delay.
    pub fn first_tick(&self) -> Option<NextTick> {
        match self.phase {
            TypingPhase::Done => None,
            TypingPhase::Deleting => Some(NextTick::Delete),
            _ => Some(NextTick::Type),
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn phrase_index(&self) -> usize {
        self.index
    }

    pub fn is_done(&self) -> bool {
        self.phase == TypingPhase::Done
    }

    /// Currently visible prefix of the active phrase.
    pub fn displayed(&self) -> &str {
        let Some(phrase) = self.phrases.get(self.index) else {
            return "";
        };
        match phrase.char_indices().nth(self.shown) {
            Some((end, _)) => &phrase[..end],
            None => phrase,
        }
    }

    /// Advance by one tick.
    pub fn step(&mut self) -> Step {
        match self.phase {
            TypingPhase::Done => Step::default(),
            TypingPhase::Typing => self.type_char(),
            TypingPhase::PauseBeforeType => {
                self.phase = TypingPhase::Typing;
                self.type_char()
            }
            TypingPhase::PauseBeforeDelete => {
                self.phase = TypingPhase::Deleting;
                self.delete_char()
            }
            TypingPhase::Deleting => self.delete_char(),
        }
    }

    fn phrase_len(&self) -> usize {
        self.phrases[self.index].chars().count()
    }

    fn is_last(&self) -> bool {
        self.index + 1 == self.phrases.len()
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.phrases.len();
    }

    fn completed(&self) -> PhraseCompleted {
        PhraseCompleted {
            text: self.phrases[self.index].clone(),
            index: self.index,
        }
    }

    fn type_char(&mut self) -> Step {
        let len = self.phrase_len();
        if self.shown < len {
            self.shown += 1;
        }
        if self.shown < len {
            return Step {
                completed: None,
                next: Some(NextTick::Type),
            };
        }

        if self.reverse {
            self.phase = TypingPhase::PauseBeforeDelete;
            return Step {
                completed: None,
                next: Some(NextTick::Pause),
            };
        }
        let completed = Some(self.completed());
        if self.is_last() && !self.looping {
            self.phase = TypingPhase::Done;
            return Step {
                completed,
                next: None,
            };
        }
        self.phase = TypingPhase::PauseBeforeDelete;
        Step {
            completed,
            next: Some(NextTick::Pause),
        }
    }

    fn delete_char(&mut self) -> Step {
        self.shown = self.shown.saturating_sub(1);
        if self.shown > 0 {
            return Step {
                completed: None,
                next: Some(NextTick::Delete),
            };
        }

        if !self.reverse {
            self.advance();
            self.phase = TypingPhase::Typing;
            return Step {
                completed: None,
                next: Some(NextTick::Type),
            };
        }
        let completed = Some(self.completed());
        if self.is_last() && !self.looping {
            self.phase = TypingPhase::Done;
            return Step {
                completed,
                next: None,
            };
        }
        self.advance();
        self.phase = TypingPhase::PauseBeforeType;
        Step {
            completed,
            next: Some(NextTick::Pause),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typewriter/state.rs"]
mod tests;
