// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Murmur Terminal UI
//!
//! Interactive terminal chat client using Ratatui.

use std::fs::{self, File};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use murmur_core::{CallbackHandler, ChatClient, ChatEvent, ChatEventKind};
use murmur_tui::app::App;
use murmur_tui::config::{Cli, TuiConfig};
use murmur_tui::handlers;
use murmur_tui::ui;

fn init_logging(config: &TuiConfig) -> Result<()> {
    let log_file = File::create(config.log_path())
        .with_context(|| format!("cannot create {}", config.log_path().display()))?;

    // The terminal belongs to the UI, so logs go to a file.
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("murmur_core=info".parse()?)
                .add_directive("murmur_tui=info".parse()?),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = TuiConfig::from_cli(Cli::parse());
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("cannot create {}", config.data_dir.display()))?;
    init_logging(&config)?;
    info!(server = %config.server_url, "Starting Murmur");

    let mut client = ChatClient::from_config(config.client_config())?
        .with_preferences(config.preference_store());
    client.add_event_handler(Arc::new(CallbackHandler::new(|event| {
        debug!(?event, "Chat event");
    })));
    client.add_event_handler(Arc::new(CallbackHandler::only(
        &[ChatEventKind::Connection],
        |event| {
            if let ChatEvent::ConnectionStateChanged { state } = event {
                info!(?state, "Push channel");
            }
        },
    )));
    let view = client.bootstrap();
    info!(?view, "Session bootstrapped");
    let mut app = App::new(client);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    info!("Murmur stopped");
    Ok(())
}

fn run_app<T: ratatui::backend::Backend>(terminal: &mut Terminal<T>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll with a timeout so pushed messages show up between key presses
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handlers::handle_key(app, key.code) {
                        handlers::Action::Quit => return Ok(()),
                        handlers::Action::Continue => {}
                    }
                }
            }
        }

        app.client.pump();
        app.client.tick();
    }
}
