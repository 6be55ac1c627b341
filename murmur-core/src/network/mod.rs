// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network + Transport Layer
//!
//! Two independent paths to the chat backend.
//!
//! # Architecture
//!
//! - **Backend trait**: request/response calls against the REST endpoints
//! - **Push channel trait**: persistent connection for server-pushed events
//! - **Protocol layer**: packet framing for the push channel
//! - **Mocks**: in-memory backend and channel for testing
//!
//! # Example
//!
//! ```ignore
//! use murmur_core::network::{ChatBackend, HttpBackend, PushChannel, WebSocketChannel};
//!
//! let mut backend = HttpBackend::new(&config)?;
//! let user = backend.login("linh", "secret")?;
//!
//! let mut channel = WebSocketChannel::new();
//! channel.connect(&config.channel_config(backend.session_cookie())?)?;
//! while let Some(event) = channel.poll()? {
//!     println!("{:?}", event);
//! }
//! ```

pub mod channel;
pub mod error;
pub mod http;
pub mod mock;
pub mod protocol;
pub mod websocket;

// Error types
pub use error::{NetworkError, NetworkResult};

// Push channel abstraction and typed events
pub use channel::{
    ChannelConfig, ClientEvent, ConnectionState, IncomingMessage, MessageNotification,
    OutgoingMessage, PushChannel, PushEvent, RoomRef,
};

// REST backend
pub use http::{ChatBackend, HttpBackend};

// Mocks for testing
pub use mock::{MockBackend, MockChannel};

// Packet framing
pub use protocol::{decode_packet, encode_packet, OpenHandshake, Packet};

// WebSocket channel for production
pub use websocket::WebSocketChannel;
