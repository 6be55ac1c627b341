// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Help Screen

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::Palette;

pub fn draw(f: &mut Frame, area: Rect, palette: &Palette) {
    let help_text = r#"
Murmur Help
===========

Navigation
----------
  Tab     Next list (friends, groups, requests, search, recent)
  1-5     Jump to a list
  j/↓     Move down
  k/↑     Move up
  Enter   Open chat / accept request / add friend
  x       Reject request
  Esc     Close conversation

Conversation
------------
  i       Write a message
  R       Reload messages
  v       Show group members
  m       Add member to group
  r       Remove member from group
  D       Delete group

Account
-------
  /       Search users
  g       Create group
  a       Upload avatar
  t       Toggle dark theme
  L       Log out

General
-------
  ?       Show this help
  q       Quit

Press Esc or q to close this help screen.
"#;

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(palette.fg))
        .block(Block::default().title("Help").borders(Borders::ALL));

    f.render_widget(help, area);
}
