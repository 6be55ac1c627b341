// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Event System
//!
//! Callbacks for client events.

use std::sync::Arc;

use crate::models::{ChatKind, Message, User};
use crate::network::ConnectionState;
use crate::state::{ToastKind, View};

/// Events emitted by the chat client.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A session was established by login or resumed at startup.
    SessionStarted {
        /// The logged-in user.
        user: User,
    },

    /// The session ended.
    SessionEnded,

    /// The visible screen changed.
    ViewChanged {
        /// The new view.
        view: View,
    },

    /// A conversation was opened.
    ConversationOpened {
        /// Friend or group.
        kind: ChatKind,
        /// Friend user id or group id.
        id: i64,
    },

    /// The open conversation was closed.
    ConversationClosed,

    /// A pushed message was appended to the open transcript.
    MessageAppended {
        /// The appended message.
        message: Message,
    },

    /// A toast was shown.
    ToastShown {
        /// Toast kind.
        kind: ToastKind,
        /// Toast text.
        message: String,
    },

    /// Push channel connection state changed.
    ConnectionStateChanged {
        /// The new connection state.
        state: ConnectionState,
    },
}

impl ChatEvent {
    /// Returns the kind of this event, for subscription filtering.
    pub fn kind(&self) -> ChatEventKind {
        match self {
            ChatEvent::SessionStarted { .. } | ChatEvent::SessionEnded => ChatEventKind::Session,
            ChatEvent::ViewChanged { .. } => ChatEventKind::View,
            ChatEvent::ConversationOpened { .. } | ChatEvent::ConversationClosed => {
                ChatEventKind::Conversation
            }
            ChatEvent::MessageAppended { .. } => ChatEventKind::Message,
            ChatEvent::ToastShown { .. } => ChatEventKind::Toast,
            ChatEvent::ConnectionStateChanged { .. } => ChatEventKind::Connection,
        }
    }
}

/// Coarse grouping of [`ChatEvent`]s a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatEventKind {
    Session,
    View,
    Conversation,
    Message,
    Toast,
    Connection,
}

/// Receives client events.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: ChatEvent);

    /// Whether `on_event` should be called for events of `kind`.
    fn wants(&self, _kind: ChatEventKind) -> bool {
        true
    }
}

/// Closure handler, optionally limited to some event kinds.
pub struct CallbackHandler<F>
where
    F: Fn(ChatEvent) + Send + Sync,
{
    callback: F,
    kinds: Option<Vec<ChatEventKind>>,
}

impl<F> CallbackHandler<F>
where
    F: Fn(ChatEvent) + Send + Sync,
{
    /// Calls `callback` for every event.
    pub fn new(callback: F) -> Self {
        CallbackHandler {
            callback,
            kinds: None,
        }
    }

    /// Calls `callback` only for events of the listed kinds.
    pub fn only(kinds: &[ChatEventKind], callback: F) -> Self {
        CallbackHandler {
            callback,
            kinds: Some(kinds.to_vec()),
        }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(ChatEvent) + Send + Sync,
{
    fn on_event(&self, event: ChatEvent) {
        (self.callback)(event);
    }

    fn wants(&self, kind: ChatEventKind) -> bool {
        self.kinds.as_ref().map_or(true, |kinds| kinds.contains(&kind))
    }
}

/// Fans controller events out to the registered handlers, in
/// registration order.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Delivers `event` to each handler that wants its kind. Returns how
    /// many handlers received it.
    pub fn dispatch(&self, event: ChatEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for handler in self.handlers.iter().filter(|h| h.wants(kind)) {
            handler.on_event(event.clone());
            delivered += 1;
        }
        delivered
    }
}
