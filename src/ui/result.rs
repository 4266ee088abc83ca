use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::{Palette, truncate};
use crate::app::App;
use crate::quiz::QuizSession;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(quiz) = app.quiz() else {
        return;
    };
    let summaries = quiz.set_summaries();

    let chunks = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(summaries.len() as u16 + 1),
        Constraint::Fill(1),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[0], quiz, palette);

    let set_lines: Vec<Line> = summaries
        .iter()
        .map(|summary| {
            Line::from(vec![
                Span::styled(
                    format!("{:>4}%  ", summary.percent),
                    Style::default().fg(palette.grade(summary.percent)).bold(),
                ),
                Span::styled(
                    format!("{} ({}/{})", summary.title, summary.correct, summary.total),
                    Style::default().fg(palette.text),
                ),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(set_lines).block(Block::default().padding(Padding::horizontal(1))),
        chunks[1],
    );

    render_question_breakdown(frame, chunks[2], quiz, app.result_scroll(), palette);
}

fn render_score_summary(frame: &mut Frame, area: Rect, quiz: &QuizSession, palette: &Palette) {
    let (answered, _) = quiz.overall_progress();
    let percentage = quiz.score_percent().unwrap_or(0);

    let content = vec![
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({}%)", quiz.correct_count(), answered, percentage),
            Style::default().fg(palette.grade(percentage)).bold(),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(palette.border),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    quiz: &QuizSession,
    scroll: u16,
    palette: &Palette,
) {
    let mut lines: Vec<Line> = Vec::new();
    for (index, result) in quiz.answer_history().iter().enumerate() {
        let (symbol, color) = if result.is_correct {
            ("+", palette.success)
        } else {
            ("-", palette.error)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(palette.muted),
            ),
            Span::styled(
                truncate(&result.prompt, QUESTION_PREVIEW_LENGTH),
                Style::default().fg(palette.text),
            ),
        ]));

        if !result.is_correct {
            let chosen = result.options.get(result.selected).map_or("", String::as_str);
            let correct = result.options.get(result.correct).map_or("", String::as_str);
            lines.push(Line::from(Span::styled(
                format!("       you: {}  ·  answer: {}", chosen, correct),
                Style::default().fg(palette.muted),
            )));
        }
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Breakdown ")
                .borders(Borders::TOP)
                .border_style(palette.border)
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll, 0));
    frame.render_widget(widget, area);
}
