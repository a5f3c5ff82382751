use super::*;

fn phrases(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Step until done (or `limit` ticks), recording the displayed text and completions.
fn run(state: &mut TypingState, limit: usize) -> (Vec<String>, Vec<PhraseCompleted>) {
    let mut frames = Vec::new();
    let mut done = Vec::new();
    for _ in 0..limit {
        let step = state.step();
        frames.push(state.displayed().to_string());
        done.extend(step.completed);
        if step.next.is_none() {
            break;
        }
    }
    (frames, done)
}

#[test]
fn forward_sequence_types_deletes_and_stops_on_last() {
    let mut s = TypingState::new(phrases(&["hi", "bye"]), false, false);
    assert_eq!(s.first_tick(), Some(NextTick::Type));
    assert_eq!(s.displayed(), "");

    let (frames, done) = run(&mut s, 100);
    assert_eq!(
        frames,
        vec!["h", "hi", "h", "", "b", "by", "bye"]
    );
    assert_eq!(
        done,
        vec![
            PhraseCompleted {
                text: "hi".to_string(),
                index: 0
            },
            PhraseCompleted {
                text: "bye".to_string(),
                index: 1
            },
        ]
    );
    assert!(s.is_done());
    assert_eq!(s.displayed(), "bye");
    assert_eq!(s.step(), Step::default());
}

#[test]
fn pause_follows_a_completed_phrase() {
    let mut s = TypingState::new(phrases(&["ab", "c"]), false, false);
    assert_eq!(s.step().next, Some(NextTick::Type));
    let full = s.step();
    assert!(full.completed.is_some());
    assert_eq!(full.next, Some(NextTick::Pause));
    assert_eq!(s.phase(), TypingPhase::PauseBeforeDelete);
    // The pause tick performs the first deletion.
    assert_eq!(s.step().next, Some(NextTick::Delete));
    assert_eq!(s.displayed(), "a");
}

#[test]
fn looping_wraps_to_the_first_phrase() {
    let mut s = TypingState::new(phrases(&["a", "b"]), true, false);
    let (frames, done) = run(&mut s, 12);
    assert_eq!(
        frames,
        vec!["a", "", "b", "", "a", "", "b", "", "a", "", "b", ""]
    );
    assert_eq!(done.len(), 6);
    assert_eq!(done[2].index, 0);
    assert!(!s.is_done());
}

#[test]
fn reverse_mode_deletes_first_and_ends_empty() {
    let mut s = TypingState::new(phrases(&["ab", "cd"]), false, true);
    assert_eq!(s.first_tick(), Some(NextTick::Delete));
    assert_eq!(s.displayed(), "ab");

    let (frames, done) = run(&mut s, 100);
    assert_eq!(frames, vec!["a", "", "c", "cd", "c", ""]);
    assert_eq!(done.iter().map(|d| d.index).collect::<Vec<_>>(), vec![0, 1]);
    assert!(s.is_done());
    assert_eq!(s.displayed(), "");
}

#[test]
fn reverse_mode_pauses_around_retyped_phrases() {
    let mut s = TypingState::new(phrases(&["a", "b"]), false, true);
    assert_eq!(s.step().next, Some(NextTick::Pause));
    assert_eq!(s.phase(), TypingPhase::PauseBeforeType);
    assert_eq!(s.step().next, Some(NextTick::Pause));
    assert_eq!(s.displayed(), "b");
    assert_eq!(s.phase(), TypingPhase::PauseBeforeDelete);
}

#[test]
fn multibyte_prefixes_stay_on_char_boundaries() {
    let mut s = TypingState::new(phrases(&["héllo"]), false, false);
    s.step();
    s.step();
    assert_eq!(s.displayed(), "hé");
}

#[test]
fn empty_phrase_completes_immediately() {
    let mut s = TypingState::new(phrases(&[""]), false, false);
    let step = s.step();
    assert_eq!(step.completed.map(|c| c.index), Some(0));
    assert!(step.next.is_none());

    let empty = TypingState::new(Vec::new(), true, false);
    assert!(empty.is_done());
    assert_eq!(empty.first_tick(), None);
}
