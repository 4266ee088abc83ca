use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::Palette;
use crate::app::{App, FormKind};

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let form = app.form();
    let height = form.fields.len() as u16 * 3 + 6;

    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(56),
        Constraint::Fill(1),
    ])
    .split(rows[1]);

    let title = match form.kind {
        FormKind::Login => "SIGN IN",
        FormKind::Register => "CREATE ACCOUNT",
    };

    let mut content = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
    ];

    for (index, field) in form.fields.iter().enumerate() {
        let focused = index == form.focus;
        let label_style = if focused {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default().fg(palette.muted)
        };
        let shown = if field.secret {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };

        content.push(Line::from(Span::styled(field.label, label_style)));
        let mut value = vec![
            Span::styled("> ", label_style),
            Span::styled(shown, Style::default().fg(palette.text)),
        ];
        if focused {
            value.push(Span::styled("_", Style::default().fg(palette.warning)));
        }
        content.push(Line::from(value));
        content.push(Line::from(""));
    }

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border)
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(widget, columns[1]);
}
