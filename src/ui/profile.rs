use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::Palette;
use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(56),
        Constraint::Fill(1),
    ])
    .split(rows[1]);

    let mut content = vec![
        Line::from(Span::styled(
            "PROFILE",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
    ];

    match app.profile() {
        Some(user) => {
            let field = |label: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", label), Style::default().fg(palette.muted)),
                    Span::styled(value, Style::default().fg(palette.text)),
                ])
            };
            content.push(field("Name", user.name().to_string()));
            content.push(field("Email", user.email.clone()));
            content.push(field("Account id", user.id.clone()));
        }
        None => content.push(Line::from("Loading...".fg(palette.muted))),
    }

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border)
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(widget, columns[1]);
}
