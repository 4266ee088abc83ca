use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::Palette;
use crate::app::App;
use crate::quiz::{Phase, QuizSession};

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(quiz) = app.quiz() else {
        return;
    };
    let question = quiz.current_question();
    let code = question.code();
    let feedback = quiz.phase() == Phase::Feedback;
    let chunks = create_layout(area, code.is_some(), feedback);

    render_progress(frame, chunks[0], quiz, palette);
    render_question_text(frame, chunks[1], &question.prompt, palette);

    let mut next = 2;
    if let Some(code) = code {
        render_code_block(frame, chunks[next], code, palette);
        next += 1;
    }

    render_options(frame, chunks[next], quiz, palette);
    if feedback {
        render_feedback(frame, chunks[next + 1], quiz, palette);
    }
}

fn create_layout(area: Rect, has_code: bool, feedback: bool) -> std::rc::Rc<[Rect]> {
    let mut constraints = vec![Constraint::Length(1), Constraint::Length(3)];
    if has_code {
        constraints.push(Constraint::Min(6));
    }
    constraints.push(Constraint::Fill(1));
    if feedback {
        constraints.push(Constraint::Length(7));
    }

    Layout::vertical(constraints).margin(1).split(area)
}

fn render_progress(frame: &mut Frame, area: Rect, quiz: &QuizSession, palette: &Palette) {
    let (answered, total) = quiz.overall_progress();
    let set_index = quiz.active_set_index();
    let (_, set_size) = quiz.set_progress(set_index);
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let set = Paragraph::new(format!(
        "{}  ·  {}/{}",
        quiz.current_set().title,
        quiz.active_question_index() + 1,
        set_size
    ))
    .fg(palette.accent);
    let overall = Paragraph::new(format!("{}/{} answered", answered, total))
        .alignment(Alignment::Right)
        .fg(palette.muted);

    frame.render_widget(set, chunks[0]);
    frame.render_widget(overall, chunks[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str, palette: &Palette) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(palette.text)
        .bold();
    frame.render_widget(widget, area);
}

fn render_code_block(frame: &mut Frame, area: Rect, code: &str, palette: &Palette) {
    let code_lines: Vec<Line> = code
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(palette.code))))
        .collect();

    let widget = Paragraph::new(code_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, quiz: &QuizSession, palette: &Palette) {
    let question = quiz.current_question();
    let submitted = quiz.is_answer_submitted();
    let selected = quiz.selected_answer();
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = selected == Some(index);
        let style = match (submitted, is_selected, question.is_correct(index)) {
            (true, _, true) => Style::default().fg(palette.success).bold(),
            (true, true, false) => Style::default().fg(palette.error).bold(),
            (false, true, _) => Style::default().fg(palette.accent).bold(),
            _ => Style::default().fg(palette.muted),
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, quiz: &QuizSession, palette: &Palette) {
    let Some(result) = quiz.last_result() else {
        return;
    };

    let (verdict, color) = if result.is_correct {
        ("Correct!", palette.success)
    } else {
        ("Not quite.", palette.error)
    };
    let mut lines = vec![Line::from(Span::styled(
        verdict,
        Style::default().fg(color).bold(),
    ))];
    if !result.is_correct {
        let answer = result
            .options
            .get(result.correct)
            .map(String::as_str)
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("The answer is {}. {}", result.correct + 1, answer),
            Style::default().fg(palette.text),
        )));
    }
    lines.push(Line::from(result.explanation.as_str().fg(palette.text)));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(color)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
