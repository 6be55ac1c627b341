// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! UI Rendering

mod auth;
mod chat;
mod help;

use murmur_core::network::{ChatBackend, ConnectionState, PushChannel};
use murmur_core::render;
use murmur_core::{AuthForm, ToastKind, View};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, InputMode};

/// Colors for the light or dark theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub own: Color,
}

impl Palette {
    pub fn for_theme(dark: bool) -> Self {
        if dark {
            Palette {
                fg: Color::Gray,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                own: Color::LightGreen,
            }
        } else {
            Palette {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                own: Color::Green,
            }
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Draw the application.
pub fn draw<B: ChatBackend, C: PushChannel>(f: &mut Frame, app: &App<B, C>) {
    let palette = Palette::for_theme(app.client.state().dark_theme);
    f.render_widget(Block::default().style(palette.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer/status
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, &palette);

    match app.view() {
        View::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center);
            f.render_widget(loading, chunks[1]);
        }
        View::Auth(form) => auth::draw(f, chunks[1], app, form, &palette),
        View::Chat if app.show_help => help::draw(f, chunks[1], &palette),
        View::Chat => chat::draw(f, chunks[1], app, &palette),
    }

    draw_footer(f, chunks[2], app, &palette);
}

fn connection_label(state: ConnectionState) -> (&'static str, Color) {
    match state {
        ConnectionState::Connected => ("● connected", Color::Green),
        ConnectionState::Connecting => ("● connecting", Color::Yellow),
        ConnectionState::Disconnected => ("● offline", Color::Red),
    }
}

fn draw_header<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let state = app.client.state();
    let title = Span::styled(
        "Murmur",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );

    let mut spans = vec![title];
    if let Some(user) = &state.user {
        let header = render::session_header(user);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(header.name, Style::default().fg(palette.fg)));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(header.handle, Style::default().fg(palette.muted)));

        let (label, color) = connection_label(state.connection);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(label, Style::default().fg(color)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn help_text<B: ChatBackend, C: PushChannel>(app: &App<B, C>) -> &'static str {
    match (app.view(), app.input_mode) {
        (View::Loading, _) => "[esc] quit",
        (View::Auth(AuthForm::Login), _) => {
            "[tab] next field  [enter] log in  [F2] register  [esc] quit"
        }
        (View::Auth(AuthForm::Register), _) => {
            "[tab] next field  [enter] register  [F2] log in  [esc] quit"
        }
        (View::Chat, InputMode::Editing) => "[enter] submit  [esc] cancel",
        (View::Chat, InputMode::Normal) if app.show_help => "[esc/q] close",
        (View::Chat, InputMode::Normal) => {
            "[tab] lists  [j/k] navigate  [enter] open  [i] write  [/] search  [?]help  [q]uit"
        }
    }
}

fn draw_footer<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    palette: &Palette,
) {
    let help = help_text(app);
    let line = match app.client.state().toasts.latest() {
        Some(toast) => {
            let color = match toast.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
                ToastKind::Info => palette.accent,
            };
            Line::from(vec![
                Span::styled(toast.message.clone(), Style::default().fg(color)),
                Span::styled(format!(" | {}", help), Style::default().fg(palette.muted)),
            ])
        }
        None => Line::from(Span::styled(help, Style::default().fg(palette.muted))),
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::{ChatClient, ClientConfig, MockBackend, MockChannel, User};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App<MockBackend, MockChannel> {
        let me = User {
            id: 1,
            username: "me".into(),
            custom_id: "me_id".into(),
            avatar_url: None,
        };
        let backend = MockBackend::new().with_account(me, "pw");
        let mut app = App::new(ChatClient::new(
            ClientConfig::default(),
            backend,
            MockChannel::new(),
        ));
        app.client.bootstrap();
        app
    }

    fn screen(app: &App<MockBackend, MockChannel>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_login_form_is_drawn() {
        let app = app();
        let text = screen(&app);
        assert!(text.contains("Log in"));
        assert!(text.contains("[F2] register"));
    }

    #[test]
    fn test_chat_shows_session_and_placeholder() {
        let mut app = app();
        app.client.login("me", "pw").unwrap();
        app.set_tab(crate::app::Tab::Requests);

        let text = screen(&app);

        assert!(text.contains("@me_id"));
        assert!(text.contains(render::NO_FRIEND_REQUESTS));
        assert!(text.contains("Logged in successfully!"));
    }
}
