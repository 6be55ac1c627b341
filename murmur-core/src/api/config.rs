// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client configuration

use std::time::Duration;

use crate::network::ChannelConfig;

/// Configuration for a chat client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub server_url: String,

    /// Path prefix of the REST endpoints
    pub api_prefix: String,

    /// Path of the event channel endpoint
    pub channel_path: String,

    /// Read timeout used when polling the channel
    pub poll_interval: Duration,

    /// Channel handshake timeout
    pub connect_timeout: Duration,

    /// HTTP timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,

    /// User agent sent with REST calls
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            api_prefix: "/api".to_string(),
            channel_path: "/socket.io/".to_string(),
            poll_interval: Duration::from_millis(50),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            user_agent: format!("Murmur/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a config for the given server with default settings.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    /// Sets an HTTP timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the channel poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the channel handshake timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL of the REST endpoints, without a trailing slash.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}{}",
            self.server_url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/')
        )
    }

    /// WebSocket URL of the event channel.
    ///
    /// `http` maps to `ws` and `https` to `wss`.
    pub fn channel_url(&self) -> String {
        let base = self.server_url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}{}?EIO=4&transport=websocket", base, self.channel_path)
    }

    /// Builds the channel config, carrying the session cookie if any.
    pub fn channel_config(&self, cookie: Option<String>) -> ChannelConfig {
        ChannelConfig {
            url: self.channel_url(),
            cookie,
            connect_timeout_ms: self.connect_timeout.as_millis() as u64,
            poll_interval_ms: (self.poll_interval.as_millis() as u64).max(1),
        }
    }
}
