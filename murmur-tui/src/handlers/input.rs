// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Keyboard Input Handling

use crossterm::event::KeyCode;
use murmur_core::network::{ChatBackend, PushChannel};
use murmur_core::View;

use crate::app::{App, InputMode, PromptKind, Tab};

/// Action to take after handling input.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Handle a key press.
pub fn handle_key<B: ChatBackend, C: PushChannel>(app: &mut App<B, C>, key: KeyCode) -> Action {
    match app.view() {
        View::Loading => match key {
            KeyCode::Esc => Action::Quit,
            _ => Action::Continue,
        },
        View::Auth(_) => handle_auth_keys(app, key),
        View::Chat => match app.input_mode {
            InputMode::Normal => handle_normal_mode(app, key),
            InputMode::Editing => handle_editing_mode(app, key),
        },
    }
}

fn handle_auth_keys<B: ChatBackend, C: PushChannel>(app: &mut App<B, C>, key: KeyCode) -> Action {
    let register = matches!(app.view(), View::Auth(murmur_core::AuthForm::Register));
    match key {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Tab | KeyCode::Down => app.auth.next_field(register),
        KeyCode::F(2) => app.toggle_auth_form(),
        KeyCode::Enter => app.submit_auth(),
        KeyCode::Backspace => {
            app.auth.focused_mut().pop();
        }
        KeyCode::Char(c) => app.auth.focused_mut().push(c),
        _ => {}
    }
    Action::Continue
}

fn handle_normal_mode<B: ChatBackend, C: PushChannel>(
    app: &mut App<B, C>,
    key: KeyCode,
) -> Action {
    if app.show_help {
        if matches!(key, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    match key {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Friends),
        KeyCode::Char('2') => app.set_tab(Tab::Groups),
        KeyCode::Char('3') => app.set_tab(Tab::Requests),
        KeyCode::Char('4') => app.set_tab(Tab::Search),
        KeyCode::Char('5') => app.set_tab(Tab::Recent),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char('x') => app.reject_selected(),
        KeyCode::Char('i') => {
            if app.client.state().active.is_some() {
                app.start_prompt(PromptKind::Compose);
            }
        }
        KeyCode::Char('/') => app.start_prompt(PromptKind::Search),
        KeyCode::Char('g') => app.start_prompt(PromptKind::CreateGroup),
        KeyCode::Char('a') => app.start_prompt(PromptKind::UploadAvatar),
        KeyCode::Char('m') => {
            if is_group_open(app) {
                app.start_prompt(PromptKind::AddMember);
            }
        }
        KeyCode::Char('r') => {
            if is_group_open(app) {
                app.start_prompt(PromptKind::RemoveMember);
            }
        }
        KeyCode::Char('v') => app.toggle_members(),
        KeyCode::Char('D') => app.delete_open_group(),
        KeyCode::Char('R') => {
            let _ = app.client.reload_messages();
        }
        KeyCode::Char('t') => {
            let _ = app.client.toggle_theme();
        }
        KeyCode::Char('L') => app.logout(),
        KeyCode::Esc => {
            app.show_members = false;
            app.client.close_conversation();
        }
        _ => {}
    }
    Action::Continue
}

fn handle_editing_mode<B: ChatBackend, C: PushChannel>(
    app: &mut App<B, C>,
    key: KeyCode,
) -> Action {
    match key {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        _ => {}
    }
    Action::Continue
}

fn is_group_open<B: ChatBackend, C: PushChannel>(app: &App<B, C>) -> bool {
    matches!(
        app.client.state().active,
        Some(murmur_core::ChatTarget::Group(_))
    )
}
