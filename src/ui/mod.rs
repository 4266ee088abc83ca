mod forms;
mod home;
mod palette;
mod profile;
mod quiz;
mod result;
mod topic;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, View};
use crate::prefs::Theme;

pub use palette::Palette;

pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_scheme(app.theme().resolved_theme());
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, chunks[0], app, &palette);

    match app.view() {
        View::Home => home::render(frame, chunks[1], app, &palette),
        View::Topic => topic::render(frame, chunks[1], app, &palette),
        View::Quiz => quiz::render(frame, chunks[1], app, &palette),
        View::Result => result::render(frame, chunks[1], app, &palette),
        View::Login | View::Register => forms::render(frame, chunks[1], app, &palette),
        View::Profile => profile::render(frame, chunks[1], app, &palette),
    }

    render_status(frame, chunks[2], app, &palette);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let theme = match app.theme().theme() {
        Theme::Light => "light",
        Theme::Dark => "dark",
        Theme::System => "system",
    };
    let account = app
        .auth()
        .user()
        .map(|user| user.name().to_string())
        .unwrap_or_else(|| "guest".to_string());

    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" LEARN WEB", Style::default().fg(palette.accent).bold()),
            Span::styled("  Next.js · React · TypeScript", Style::default().fg(palette.muted)),
        ])),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(format!("{}  ·  theme: {} ", account, theme))
            .alignment(Alignment::Right)
            .fg(palette.muted),
        chunks[1],
    );
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let widget = match app.status() {
        Some(status) => {
            let color = if status.is_error {
                palette.error
            } else {
                palette.success
            };
            Paragraph::new(status.text.as_str()).fg(color)
        }
        None => Paragraph::new(hints(app.view())).fg(palette.muted),
    };
    frame.render_widget(widget.alignment(Alignment::Center), area);
}

fn hints(view: View) -> &'static str {
    match view {
        View::Home => "j/k move  ·  enter open  ·  t theme  ·  q quit",
        View::Topic => {
            "j/k section  ·  h/l tab  ·  tab sub-section  ·  enter practice  ·  [ ] sidebars  ·  esc back"
        }
        View::Quiz => "1-9 / j/k choose  ·  enter submit / next  ·  r restart  ·  esc leave",
        View::Result => "j/k scroll  ·  r retry  ·  esc done",
        View::Login | View::Register => "tab next field  ·  enter submit  ·  esc cancel",
        View::Profile => "r reload  ·  o sign out  ·  esc back",
    }
}

/// Cut `text` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
