//! Frame rendering
//!
//! Pure functions from the UI model to ratatui widgets. The slide variants
//! are matched exhaustively; adding a variant is a compile error until every
//! renderer handles it.

use super::model::{Role, ScreenView, UiModel};
use crate::config::Slide;
use crate::player::SlideNode;
use pulldown_cmark::{Event as MdEvent, Parser, Tag, TagEnd};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

const CURSOR: &str = "▌";

pub fn render(frame: &mut Frame, model: &UiModel) {
    match model.screen {
        ScreenView::Chat => render_chat(frame, model),
        ScreenView::Loading => render_loading(frame),
        ScreenView::Player => render_player(frame, model),
    }
}

// ============================================================================
// Chat surface
// ============================================================================

fn render_chat(frame: &mut Frame, model: &UiModel) {
    let suggestion_height = u16::try_from(model.suggestions.len()).unwrap_or(u16::MAX) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(suggestion_height),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, model, chunks[0]);
    render_messages(frame, model, chunks[1]);
    render_suggestions(frame, model, chunks[2]);
    render_input(frame, model, chunks[3]);
}

fn render_header(frame: &mut Frame, model: &UiModel, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("✨ {} 年度回顾", model.year),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            model.team_name.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn render_messages(frame: &mut Frame, model: &UiModel, area: Rect) {
    if model.welcome_visible && model.messages.is_empty() {
        let welcome = Paragraph::new(vec![
            Line::default(),
            Line::from("你好！问我点什么吧，"),
            Line::from("或者选择下方的快捷卡片，回顾我们的这一年。"),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(welcome, area);
        return;
    }

    let lines = chat_lines(model);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let scroll = total.saturating_sub(area.height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn chat_lines(model: &UiModel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let last = model.messages.len().saturating_sub(1);
    for (i, message) in model.messages.iter().enumerate() {
        let (icon, color) = match message.role {
            Role::User => ("👤", Color::Yellow),
            Role::Assistant => ("✨", Color::Cyan),
        };
        let streaming_here = model.streaming && i == last && message.role == Role::Assistant;
        let timestamp = message.created_at.format("%H:%M");
        let mut text_lines = message.text.split('\n').peekable();
        let mut first = true;
        while let Some(text) = text_lines.next() {
            let mut spans = vec![if first {
                Span::styled(
                    format!("{icon} {timestamp} "),
                    Style::default().fg(color),
                )
            } else {
                Span::raw("         ")
            }];
            spans.push(Span::raw(text.to_string()));
            if streaming_here && text_lines.peek().is_none() {
                spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
            }
            lines.push(Line::from(spans));
            first = false;
        }
        lines.push(Line::default());
    }
    lines
}

fn render_suggestions(frame: &mut Frame, model: &UiModel, area: Rect) {
    let lines: Vec<Line> = model
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, prompt)| {
            if i == model.selected_suggestion {
                Line::from(Span::styled(
                    format!("❯ {prompt}"),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {prompt}"),
                    Style::default().fg(Color::Gray),
                ))
            }
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 快捷卡片 (Tab 切换, Enter 选择) ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_input(frame: &mut Frame, model: &UiModel, area: Rect) {
    let (hint, style) = if model.input_enabled {
        (" ⏎ 发送 ", Style::default())
    } else {
        (" …正在输入 ", Style::default().fg(Color::DarkGray))
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(hint)
        .border_style(style);
    let text = Line::from(vec![
        Span::raw(model.input.clone()),
        Span::styled("▏", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ============================================================================
// Loading overlay
// ============================================================================

fn render_loading(frame: &mut Frame) {
    let lines = vec![
        Line::from(Span::styled(
            "✨ 正在生成年度总结…",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "马上就好",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    render_centered(frame, frame.area(), lines);
}

// ============================================================================
// Slide player
// ============================================================================

fn render_player(frame: &mut Frame, model: &UiModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    if let Some(node) = model.active_node() {
        render_centered(frame, chunks[0], slide_lines(model, node));
    }

    let hint = Paragraph::new(Line::from(Span::styled(
        "← → 翻页 · 空格 下一页 · Esc 退出 · r 重播",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[1]);

    let (current, total) = (
        model
            .active_node()
            .map_or(0, |n| n.index + 1),
        model.nodes.len(),
    );
    let gauge = Gauge::default()
        .ratio((model.progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{current}/{total}"))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black));
    frame.render_widget(gauge, chunks[2]);
}

fn slide_lines(model: &UiModel, node: &SlideNode) -> Vec<Line<'static>> {
    match &node.slide {
        Slide::Intro { subtitle, .. } => vec![
            Line::from(Span::styled(
                model.year.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                model.team_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                subtitle.clone(),
                Style::default().fg(Color::Gray),
            )),
        ],
        Slide::Stat {
            icon,
            label,
            value,
            unit,
            comment,
        } => {
            let display = node.stat_display.clone().unwrap_or_else(|| value.clone());
            let mut lines = vec![
                Line::from(icon.clone()),
                Line::default(),
                Line::from(Span::styled(
                    label.clone(),
                    Style::default().fg(Color::Gray),
                )),
                Line::default(),
                Line::from(vec![
                    Span::styled(
                        display,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(unit.clone(), Style::default().fg(Color::Gray)),
                ]),
            ];
            if let Some(comment) = comment {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    comment.clone(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
            lines
        }
        Slide::Photo { src, caption } => vec![
            Line::from(Span::styled(
                format!("🖼  {src}"),
                Style::default().fg(Color::Blue),
            )),
            Line::default(),
            Line::from(Span::styled(
                caption.clone(),
                Style::default().fg(Color::Gray),
            )),
        ],
        Slide::Text { content } => markdown_lines(content),
        Slide::Outro { thanks, message } => vec![
            Line::from(Span::styled(
                thanks.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(message.clone()),
            Line::default(),
            Line::from(Span::styled(
                "[r] 再看一遍",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    }
}

/// Render trusted markdown into styled lines. Only the inline subset the
/// deck uses is interpreted; everything else passes through as text.
fn markdown_lines(content: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut bold = false;
    let mut emphasis = false;

    for event in Parser::new(content) {
        match event {
            MdEvent::Start(Tag::Paragraph) => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
            }
            MdEvent::End(TagEnd::Paragraph) => {
                if !spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut spans)));
                }
            }
            MdEvent::Start(Tag::Strong) => bold = true,
            MdEvent::End(TagEnd::Strong) => bold = false,
            MdEvent::Start(Tag::Emphasis) => emphasis = true,
            MdEvent::End(TagEnd::Emphasis) => emphasis = false,
            MdEvent::Text(text) | MdEvent::Code(text) => {
                let mut style = Style::default();
                if bold {
                    style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                }
                if emphasis {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                spans.push(Span::styled(text.into_string(), style));
            }
            MdEvent::SoftBreak | MdEvent::HardBreak => {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            _ => {}
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

/// Vertically center a block of lines inside `area`.
fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let content_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let pad = area.height.saturating_sub(content_height) / 2;
    let mut padded: Vec<Line<'static>> = std::iter::repeat_with(Line::default)
        .take(usize::from(pad))
        .collect();
    padded.extend(lines);
    let paragraph = Paragraph::new(padded)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
