use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};
use unicode_width::UnicodeWidthStr;

use keyor::session::Session;

pub const SEPARATOR: &str = "●";

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn done_style() -> Style {
    bold().fg(Color::Green)
}

fn mistake_style() -> Style {
    bold().fg(Color::Red)
}

fn pending_style() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn cursor_style() -> Style {
    pending_style().add_modifier(Modifier::UNDERLINED)
}

/// Styled spans for the whole round: one span per character plus a
/// separator between words.
pub fn word_spans(session: &Session) -> Vec<Span<'static>> {
    let active = session.active_index();
    let mut spans = Vec::new();

    for index in 0..session.len() {
        for (offset, c) in session.displayed_chars(index).iter().enumerate() {
            let style = char_style(session, index, offset);
            spans.push(Span::styled(c.to_string(), style));
        }
        if index + 1 < session.len() {
            spans.push(Span::styled(
                format!(" {SEPARATOR} "),
                separator_style(session, index, active),
            ));
        }
    }

    spans
}

fn char_style(session: &Session, index: usize, offset: usize) -> Style {
    let active = session.active_index();
    let typed = session.input_len();

    if session.is_mistake(index, offset) && !(index == active && offset == typed) {
        return mistake_style();
    }

    if index < active || (index == active && offset < typed) {
        return done_style();
    }

    if index == active && offset == typed {
        return if session.is_error() {
            mistake_style().add_modifier(Modifier::UNDERLINED)
        } else {
            cursor_style()
        };
    }

    pending_style()
}

fn separator_style(session: &Session, index: usize, active: usize) -> Style {
    let end = session.displayed_chars(index).len();

    if index == active {
        if session.is_error() && session.is_word_complete() {
            return mistake_style();
        }
        if session.is_word_complete() {
            return bold().fg(Color::Yellow);
        }
    }

    // overflow past the word end is logged at the separator position
    if session.is_mistake(index, end) {
        return mistake_style();
    }

    if index < active {
        done_style()
    } else {
        pending_style()
    }
}

/// Display width of the rendered row
pub fn row_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.content.width()).sum()
}
