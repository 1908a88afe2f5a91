use crate::session::Key;
use crate::trainer::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a terminal key event into a trainer command.
///
/// Bindings: `Esc`/`Ctrl+C` quit, `Ctrl+V` voice-over, `Tab` next category,
/// `Ctrl+L` next language, `Ctrl+N` new round. A plain single character is
/// typing input; anything else is ignored.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let plain = !key.modifiers.intersects(
        KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META,
    );

    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if ctrl => Some(Command::Quit),
        KeyCode::Char('v') if ctrl => Some(Command::ToggleVoice),
        KeyCode::Char('l') if ctrl => Some(Command::NextLanguage),
        KeyCode::Char('n') if ctrl => Some(Command::NewRound),
        KeyCode::Tab => Some(Command::NextCategory),
        KeyCode::Backspace => Some(Command::Type(Key::Backspace)),
        KeyCode::Char(' ') if plain => Some(Command::Type(Key::Space)),
        KeyCode::Char(c) if plain => Some(Command::Type(Key::Char(c))),
        _ => None,
    }
}
