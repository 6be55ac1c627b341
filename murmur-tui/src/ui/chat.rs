// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chat Screen

use murmur_core::network::{ChatBackend, PushChannel};
use murmur_core::render::{self, Avatar, Fragment};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap};

use super::Palette;
use crate::app::{App, InputMode, Tab};

pub fn draw<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(0)])
        .split(area);

    draw_sidebar(f, columns[0], app, palette);
    draw_conversation(f, columns[1], app, palette);
}

fn avatar_marker(avatar: &Avatar) -> &'static str {
    match avatar {
        Avatar::Image(_) => "◉",
        Avatar::User => "○",
        Avatar::Group => "◎",
    }
}

fn draw_sidebar<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let titles: Vec<&str> = Tab::ALL.iter().map(Tab::title).collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(tabs, chunks[0]);

    let block = Block::default().borders(Borders::ALL).title(app.tab.title());
    match app.entries() {
        Fragment::Placeholder(text) => {
            let empty = Paragraph::new(text)
                .style(Style::default().fg(palette.muted))
                .block(block);
            f.render_widget(empty, chunks[1]);
        }
        Fragment::Items(entries) => {
            let items: Vec<ListItem> = entries
                .iter()
                .map(|entry| {
                    let style = if entry.active {
                        Style::default()
                            .fg(palette.accent)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(palette.fg)
                    };
                    let lines = vec![
                        Line::from(vec![
                            Span::raw(format!("{} ", avatar_marker(&entry.avatar))),
                            Span::styled(entry.title.clone(), style),
                        ]),
                        Line::from(Span::styled(
                            format!("  {}", entry.subtitle),
                            Style::default().fg(palette.muted),
                        )),
                    ];
                    ListItem::new(lines)
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");

            let mut state = ListState::default();
            state.select(Some(app.selected));
            f.render_stateful_widget(list, chunks[1], &mut state);
        }
    }
}

fn draw_conversation<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let state = app.client.state();
    let Some(target) = &state.active else {
        let hint = Paragraph::new("Select a friend or group to start chatting")
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(hint, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    let header = render::conversation_header(target);
    let title = Line::from(vec![
        Span::raw(format!("{} ", avatar_marker(&header.avatar))),
        Span::styled(
            header.title,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", header.status),
            Style::default().fg(palette.muted),
        ),
    ]);
    f.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let body = if app.show_members {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(28)])
            .split(chunks[1])
    } else {
        Layout::default()
            .constraints([Constraint::Min(0)])
            .split(chunks[1])
    };

    draw_transcript(f, body[0], app, palette);
    if app.show_members {
        draw_members(f, body[1], app, palette);
    }

    draw_input(f, chunks[2], app, palette);
}

fn draw_transcript<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let state = app.client.state();
    let lines: Vec<Line> = match render::transcript(&state.transcript, state.user_id()) {
        Fragment::Placeholder(text) => vec![Line::from(Span::styled(
            text,
            Style::default().fg(palette.muted),
        ))],
        Fragment::Items(messages) => messages
            .into_iter()
            .map(|line| {
                let sender = if line.own {
                    Style::default().fg(palette.own).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
                };
                Line::from(vec![
                    Span::styled(format!("{} ", line.time), Style::default().fg(palette.muted)),
                    Span::styled(format!("{}: ", line.sender), sender),
                    Span::styled(line.content, Style::default().fg(palette.fg)),
                ])
            })
            .collect(),
    };

    // Keep the newest messages in view.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(transcript, area);
}

fn draw_members<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let block = Block::default().borders(Borders::ALL).title("Members");
    let members = render::group_member_list(&app.client.state().group_members);
    let items: Vec<ListItem> = members
        .items()
        .iter()
        .map(|entry| {
            ListItem::new(format!("{} {}", entry.title, entry.subtitle))
                .style(Style::default().fg(palette.fg))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn draw_input<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let (text, style) = match app.input_mode {
        InputMode::Editing => (
            format!("{}_", app.input_buffer),
            Style::default().fg(palette.accent),
        ),
        InputMode::Normal => (
            "Press i to write a message".to_string(),
            Style::default().fg(palette.muted),
        ),
    };
    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(app.prompt.label()));
    f.render_widget(input, area);
}
