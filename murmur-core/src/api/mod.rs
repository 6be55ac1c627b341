// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Murmur API Layer
//!
//! High-level API for driving a chat session.
//!
//! # Overview
//!
//! The API layer coordinates:
//! - Session bootstrap, login and logout
//! - Friend and group management
//! - Conversation switching and real-time delivery
//! - Event handling
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use murmur_core::api::{CallbackHandler, ChatClient, ClientConfig};
//!
//! let mut client = ChatClient::from_config(ClientConfig::default())?;
//! client.add_event_handler(Arc::new(CallbackHandler::new(|event| {
//!     println!("Event: {:?}", event);
//! })));
//!
//! client.login("linh", "secret")?;
//! println!("You have {} friends", client.state().friends.len());
//! ```
//!
//! # Module Structure
//!
//! - [`error`] - Error types for the API layer
//! - [`config`] - Configuration types
//! - [`events`] - Event system for callbacks
//! - [`controller`] - Main chat controller

pub mod config;
pub mod controller;
pub mod error;
pub mod events;

// Error types
pub use error::{ChatError, ChatResult};

// Configuration
pub use config::ClientConfig;

// Events
pub use events::{CallbackHandler, ChatEvent, ChatEventKind, EventDispatcher, EventHandler};

// Controller
pub use controller::ChatClient;
