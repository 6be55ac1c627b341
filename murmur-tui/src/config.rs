// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! TUI Configuration

use std::path::PathBuf;

use clap::Parser;
use murmur_core::{ClientConfig, PreferenceStore};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(version, about = "Friend and group chat in the terminal")]
pub struct Cli {
    /// Chat server URL
    #[arg(
        long,
        env = "MURMUR_SERVER",
        default_value = "http://localhost:5000"
    )]
    pub server: String,

    /// Data directory (default: platform data dir + /murmur)
    #[arg(long, env = "MURMUR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// HTTP timeout in seconds (default: none)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Resolved TUI configuration.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Data directory for preferences and logs.
    pub data_dir: PathBuf,
    /// Chat server URL.
    pub server_url: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl TuiConfig {
    /// Builds the configuration from parsed arguments.
    pub fn from_cli(cli: Cli) -> Self {
        let data_dir = cli.data_dir.unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("murmur")
        });
        TuiConfig {
            data_dir,
            server_url: cli.server,
            timeout_secs: cli.timeout,
        }
    }

    /// Returns the log file path.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("murmur.log")
    }

    /// Returns the preference store in the data directory.
    pub fn preference_store(&self) -> PreferenceStore {
        PreferenceStore::new(&self.data_dir)
    }

    /// Returns the client configuration.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.server_url.clone());
        match self.timeout_secs {
            Some(secs) => config.with_request_timeout(std::time::Duration::from_secs(secs)),
            None => config,
        }
    }
}
