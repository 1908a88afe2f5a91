use crate::session::{BackspacePolicy, Key, KeyOutcome, Session};
use std::time::SystemTime;

/// Feed one key to the session. Every transition of the state machine goes
/// through here; the caller decides what to do once a round completes.
pub fn apply_key(session: &mut Session, key: Key, now: SystemTime) -> KeyOutcome {
    if session.is_empty() {
        return KeyOutcome::Ignored;
    }

    match key {
        Key::Char(c) => write_char(session, c, now),
        Key::Space => write_space(session, now),
        Key::Backspace => erase(session),
    }
}

pub fn write_char(session: &mut Session, c: char, now: SystemTime) -> KeyOutcome {
    session.round.start_if_idle(now);
    session.round.chars_typed += 1;

    let word = session.active;
    let offset = session.input_len();
    let expected = session.displayed_chars(word).get(offset).copied();

    match expected {
        None => {
            session.record_error(offset);
            KeyOutcome::Overflow { word, offset }
        }
        Some(expected) if expected == c => {
            session.input.push(c);
            session.is_error = false;
            KeyOutcome::Accepted
        }
        Some(_) => {
            session.record_error(offset);
            KeyOutcome::Mismatch { word, offset }
        }
    }
}

pub fn write_space(session: &mut Session, now: SystemTime) -> KeyOutcome {
    session.round.start_if_idle(now);

    let word = session.active;
    if !session.is_word_complete() {
        let offset = session.input_len();
        session.record_error(offset);
        return KeyOutcome::Mismatch { word, offset };
    }

    if session.is_last_word() {
        return KeyOutcome::RoundComplete;
    }

    session.active += 1;
    session.input.clear();
    session.is_error = false;
    KeyOutcome::Advanced {
        index: session.active,
    }
}

pub fn erase(session: &mut Session) -> KeyOutcome {
    match session.backspace {
        BackspacePolicy::Disabled => KeyOutcome::Ignored,
        BackspacePolicy::Enabled => {
            session.input.pop();
            session.is_error = false;
            KeyOutcome::Erased
        }
    }
}
