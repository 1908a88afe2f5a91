pub mod summary;
pub mod word_row;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let trainer = &self.trainer;
        let session = trainer.session();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let spans = word_row::word_spans(session);
        let row_width = word_row::row_width(&spans);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let row_lines = if row_width <= max_chars_per_line as usize {
            1
        } else {
            ((row_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(1),    // padding
                Constraint::Length(1), // translation
                Constraint::Length(1),
                Constraint::Length(row_lines),
                Constraint::Length(1),
                Constraint::Length(1), // stats
                Constraint::Length(1), // timer
                Constraint::Min(1),    // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let voice = if trainer.voice_enabled() {
            Span::styled("voice on", Style::default().fg(Color::Green))
        } else {
            Span::styled("voice off", dim_style)
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("keyor", bold_style.fg(Color::Magenta)),
            Span::styled(
                format!(
                    "   {} / {}   ",
                    trainer.vocabulary().name,
                    trainer.category_title()
                ),
                bold_style,
            ),
            voice,
        ]))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        let translation = Paragraph::new(Span::styled(
            trainer.translation().to_string(),
            italic_style.fg(Color::Cyan),
        ))
        .alignment(Alignment::Center);
        translation.render(chunks[2], buf);

        let row = Paragraph::new(Line::from(spans))
            .alignment(if row_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true });
        row.render(chunks[4], buf);

        Paragraph::new(summary::stats_line(trainer.statistics()))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        Paragraph::new(Span::styled(
            summary::format_elapsed(trainer.elapsed(self.now)),
            dim_style.patch(bold_style),
        ))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);

        Paragraph::new(summary::legend())
            .alignment(Alignment::Center)
            .render(chunks[9], buf);
    }
}
