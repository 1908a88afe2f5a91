use std::time::Duration;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use keyor::stats::{Statistics, Trend};

fn trend_span(trend: Option<Trend>) -> Span<'static> {
    match trend {
        Some(Trend::Up) => Span::styled(format!(" {}", Trend::Up), Style::default().fg(Color::Green)),
        Some(Trend::Down) => Span::styled(format!(" {}", Trend::Down), Style::default().fg(Color::Red)),
        Some(Trend::Same) => Span::styled(
            format!(" {}", Trend::Same),
            Style::default().add_modifier(Modifier::DIM),
        ),
        None => Span::raw(""),
    }
}

/// `WPM: 42 ↑   Accuracy: 95% ↓   Rounds: 3`
pub fn stats_line(stats: &Statistics) -> Line<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::raw("WPM: "),
        Span::styled(stats.wpm().to_string(), bold),
        trend_span(stats.wpm_trend()),
        Span::raw("   Accuracy: "),
        Span::styled(format!("{}%", stats.accuracy()), bold),
        trend_span(stats.accuracy_trend()),
        Span::raw(format!("   Rounds: {}", stats.rounds_completed())),
    ])
}

/// Elapsed round time as `mm:ss`; the clock only runs once typing starts
pub fn format_elapsed(elapsed: Option<Duration>) -> String {
    let secs = elapsed.map_or(0, |d| d.as_secs());
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn legend() -> Line<'static> {
    let key = Style::default().fg(Color::Cyan);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let entries = [
        ("tab", "category"),
        ("ctrl+l", "language"),
        ("ctrl+n", "new round"),
        ("ctrl+v", "voice"),
        ("esc", "quit"),
    ];

    let mut spans = Vec::new();
    for (i, (k, what)) in entries.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", dim));
        }
        spans.push(Span::styled(format!("({k})"), key));
        spans.push(Span::styled(format!(" {what}"), dim));
    }
    Line::from(spans)
}
