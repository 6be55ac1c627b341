// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Murmur Core Library
//!
//! Client side of a friend and group chat service: a REST transport, a
//! push channel for real-time delivery, the session state they feed, and
//! pure render functions that project that state for a front end.

pub mod api;
pub mod models;
pub mod network;
pub mod preferences;
pub mod render;
pub mod state;

pub use api::{
    CallbackHandler, ChatClient, ChatError, ChatEvent, ChatEventKind, ChatResult, ClientConfig,
    EventDispatcher, EventHandler,
};
pub use models::{
    ChatKind, ChatTarget, ConversationSummary, FriendRequest, Group, GroupId, GroupMember,
    Message, User, UserId,
};
pub use network::{
    ChannelConfig, ChatBackend, ClientEvent, ConnectionState, HttpBackend, MockBackend,
    MockChannel, NetworkError, PushChannel, PushEvent, WebSocketChannel,
};
pub use preferences::{PreferenceStore, Preferences};
pub use state::{AppState, AuthForm, Toast, ToastKind, Toasts, View};
