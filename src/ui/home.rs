use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::Palette;
use crate::app::{App, HomeEntry};

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let entries = app.home_entries();
    let height = entries.len() as u16 * 2 + 6;

    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(72),
        Constraint::Fill(1),
    ])
    .split(rows[1]);

    let mut lines = vec![
        Line::from(Span::styled(
            "What do you want to learn today?",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
    ];

    for (index, entry) in entries.iter().enumerate() {
        let is_selected = index == app.home_selected();
        let style = if is_selected {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default().fg(palette.text)
        };
        let marker = if is_selected { ">" } else { " " };
        let (label, detail) = describe(app, *entry);

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(label, style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", detail),
            Style::default().fg(palette.muted),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border)
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(widget, columns[1]);
}

fn describe(app: &App, entry: HomeEntry) -> (String, String) {
    let catalog = app.catalog();
    match entry {
        HomeEntry::Topic(index) => catalog
            .topics
            .get(index)
            .map(|topic| (topic.title.clone(), topic.summary.clone()))
            .unwrap_or_default(),
        HomeEntry::FullQuiz => (
            "Category quiz".to_string(),
            format!(
                "{} questions in {} categories",
                catalog.question_count(),
                catalog.quiz.len()
            ),
        ),
        HomeEntry::Login => ("Sign in".to_string(), "Use an existing account".to_string()),
        HomeEntry::Register => (
            "Create account".to_string(),
            "Register with email and password".to_string(),
        ),
        HomeEntry::Profile => (
            "Profile".to_string(),
            app.auth()
                .user()
                .map(|user| user.email.clone())
                .unwrap_or_default(),
        ),
        HomeEntry::Logout => ("Sign out".to_string(), "Forget the saved login".to_string()),
    }
}
