use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Tabs, Wrap},
};

use super::Palette;
use crate::app::{App, TopicTab};
use crate::models::{Example, Section};
use crate::prefs::Side;

const LEFT_WIDTH: u16 = 28;
const RIGHT_WIDTH: u16 = 34;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(topic) = app.current_topic() else {
        return;
    };

    let left_open = app.sidebars().is_open(Side::Left);
    let right_open = app.sidebars().is_open(Side::Right);
    let columns = Layout::horizontal([
        Constraint::Length(if left_open { LEFT_WIDTH } else { 0 }),
        Constraint::Fill(1),
        Constraint::Length(if right_open { RIGHT_WIDTH } else { 0 }),
    ])
    .split(area);

    if left_open {
        render_sections(frame, columns[0], app, palette);
    }
    if right_open {
        render_key_points(frame, columns[2], app, palette);
    }

    let Some(section) = app.current_section() else {
        let empty = Paragraph::new(format!("{} has no sections yet.", topic.title))
            .fg(palette.muted);
        frame.render_widget(empty, columns[1]);
        return;
    };

    let has_children = !section.children.is_empty();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(if has_children { 1 } else { 0 }),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .horizontal_margin(1)
    .split(columns[1]);

    let tabs = Tabs::new(TopicTab::ALL.iter().map(|tab| tab.title()))
        .select(app.topic_cursor().tab.index())
        .style(Style::default().fg(palette.muted))
        .highlight_style(Style::default().fg(palette.accent).bold());
    frame.render_widget(tabs, chunks[0]);

    if has_children {
        let titles = std::iter::once(section.title.as_str())
            .chain(section.children.iter().map(|child| child.title.as_str()));
        let sub_tabs = Tabs::new(titles)
            .select(app.topic_cursor().child)
            .style(Style::default().fg(palette.muted))
            .highlight_style(Style::default().fg(palette.warning));
        frame.render_widget(sub_tabs, chunks[1]);
    }

    let Some(focused) = app.focused_section() else {
        return;
    };

    let lines = match app.topic_cursor().tab {
        TopicTab::Overview => overview_lines(focused, !right_open, palette),
        TopicTab::Examples => example_lines(focused, palette),
        TopicTab::Practice => practice_lines(focused, palette),
    };

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.topic_cursor().scroll, 0));
    frame.render_widget(widget, chunks[3]);
}

fn render_sections(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(topic) = app.current_topic() else {
        return;
    };

    let lines: Vec<Line> = topic
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let is_selected = index == app.topic_cursor().section;
            let style = if is_selected {
                Style::default().fg(palette.accent).bold()
            } else {
                Style::default().fg(palette.text)
            };
            let marker = if is_selected { ">" } else { " " };
            Line::from(vec![
                Span::styled(format!("{} ", marker), style),
                Span::styled(super::truncate(&section.title, LEFT_WIDTH as usize - 6), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(topic.title.as_str())
            .borders(Borders::RIGHT)
            .border_style(palette.border)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_key_points(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let points = app
        .focused_section()
        .map(|section| section.key_points.as_slice())
        .unwrap_or_default();

    let lines: Vec<Line> = if points.is_empty() {
        vec![Line::from("Nothing to summarise here.".fg(palette.muted))]
    } else {
        points
            .iter()
            .map(|point| {
                Line::from(Span::styled(
                    format!("• {}", point),
                    Style::default().fg(palette.text),
                ))
            })
            .collect()
    };

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title("Key points")
            .borders(Borders::LEFT)
            .border_style(palette.border)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn heading<'a>(text: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(Span::styled(text, Style::default().fg(palette.accent).bold()))
}

fn bullets<'a>(items: &'a [String], palette: &Palette) -> impl Iterator<Item = Line<'a>> {
    let color = palette.text;
    items.iter().map(move |item| {
        Line::from(Span::styled(
            format!("  • {}", item),
            Style::default().fg(color),
        ))
    })
}

fn code_lines<'a>(code: &'a str, palette: &Palette) -> impl Iterator<Item = Line<'a>> {
    let color = palette.code;
    code.lines().map(move |line| {
        Line::from(Span::styled(
            format!("    {}", line),
            Style::default().fg(color),
        ))
    })
}

fn overview_lines<'a>(
    section: &'a Section,
    with_key_points: bool,
    palette: &Palette,
) -> Vec<Line<'a>> {
    let mut lines = vec![
        heading(&section.title, palette),
        Line::from(""),
        Line::from(section.description.as_str().fg(palette.text)),
    ];

    if with_key_points && !section.key_points.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Key points", palette));
        lines.extend(bullets(&section.key_points, palette));
    }

    for group in &section.details {
        lines.push(Line::from(""));
        lines.push(heading(&group.heading, palette));
        lines.extend(bullets(&group.items, palette));
    }

    lines
}

fn example_lines<'a>(section: &'a Section, palette: &Palette) -> Vec<Line<'a>> {
    if section.examples.is_empty() {
        return vec![Line::from("No examples for this section.".fg(palette.muted))];
    }

    let mut lines = Vec::new();
    for example in &section.examples {
        push_example(&mut lines, example, palette);
    }
    lines
}

fn push_example<'a>(lines: &mut Vec<Line<'a>>, example: &'a Example, palette: &Palette) {
    lines.push(heading(&example.name, palette));
    lines.push(Line::from(example.description.as_str().fg(palette.text)));
    lines.push(Line::from(""));
    lines.extend(code_lines(&example.code, palette));

    if let Some(good) = &example.correct_usage {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Do", Style::default().fg(palette.success).bold())));
        lines.extend(code_lines(good, palette));
    }
    if let Some(bad) = &example.incorrect_usage {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Don't", Style::default().fg(palette.error).bold())));
        lines.extend(code_lines(bad, palette));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(example.explanation.as_str().fg(palette.text)));
    lines.extend(bullets(&example.key_points, palette));
    if !example.benefits.is_empty() {
        lines.push(Line::from("Benefits".fg(palette.muted)));
        lines.extend(bullets(&example.benefits, palette));
    }
    lines.push(Line::from(""));
}

fn practice_lines<'a>(section: &'a Section, palette: &Palette) -> Vec<Line<'a>> {
    if !section.has_practice() {
        return vec![Line::from("No practice questions for this section.".fg(palette.muted))];
    }

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} practice questions", section.practice.len()),
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from("Press enter to start.".fg(palette.muted)),
        Line::from(""),
    ];
    lines.extend(
        section
            .practice
            .iter()
            .enumerate()
            .map(|(index, question)| {
                Line::from(Span::styled(
                    format!("{:2}. {}", index + 1, question.prompt),
                    Style::default().fg(palette.text),
                ))
            }),
    );
    lines
}
