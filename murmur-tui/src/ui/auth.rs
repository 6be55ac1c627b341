// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Login and Registration Forms

use murmur_core::network::{ChatBackend, PushChannel};
use murmur_core::AuthForm;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::Palette;
use crate::app::{App, AuthField};

pub fn draw<B: ChatBackend, C: PushChannel>(
    f: &mut Frame,
    area: Rect,
    app: &App<B, C>,
    form: AuthForm,
    palette: &Palette,
) {
    let register = form == AuthForm::Register;
    let title = if register { "Register" } else { "Log in" };

    let outer = Block::default().title(title).borders(Borders::ALL);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let mut fields = vec![("Username", AuthField::Username, app.auth.username.clone())];
    if register {
        fields.push(("Handle", AuthField::CustomId, app.auth.custom_id.clone()));
    }
    let masked = "*".repeat(app.auth.password.chars().count());
    fields.push(("Password", AuthField::Password, masked));

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    for (i, (label, field, value)) in fields.into_iter().enumerate() {
        let focused = app.auth.focus == field;
        let style = if focused {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.fg)
        };
        let text = if focused {
            format!("{}_", value)
        } else {
            value
        };
        let input = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(label));
        f.render_widget(input, rows[i]);
    }
}
