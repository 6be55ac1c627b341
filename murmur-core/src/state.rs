// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Application State
//!
//! Everything the front end renders from. Nothing here is persisted: the
//! state is rebuilt from the backend on start and reset on logout.

use std::time::{Duration, Instant};

use crate::models::{
    ChatKind, ChatTarget, ConversationSummary, FriendRequest, Group, GroupMember, Message, User,
};
use crate::network::{ConnectionState, IncomingMessage, MessageNotification};

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Which authentication form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Login,
    Register,
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Waiting for the session check.
    Loading,
    /// Not logged in.
    Auth(AuthForm),
    /// Logged in.
    Chat,
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    /// Returns true once the toast has been visible for [`TOAST_TTL`].
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= TOAST_TTL
    }
}

/// Visible toasts, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a toast starting now.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    /// Shows a toast created at `created_at`.
    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, created_at: Instant) {
        self.items.push(Toast {
            kind,
            message: message.into(),
            created_at,
        });
    }

    /// Drops toasts that have expired at `now`. Returns how many were dropped.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|t| !t.is_expired(now));
        before - self.items.len()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Client state shared by the controller and the renderers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    /// Logged-in user.
    pub user: Option<User>,
    /// Open conversation, at most one.
    pub active: Option<ChatTarget>,
    pub friends: Vec<User>,
    pub groups: Vec<Group>,
    pub friend_requests: Vec<FriendRequest>,
    pub search_results: Vec<User>,
    pub conversations: Vec<ConversationSummary>,
    /// Members of the open group.
    pub group_members: Vec<GroupMember>,
    /// Messages of the open conversation in arrival order.
    pub transcript: Vec<Message>,
    pub toasts: Toasts,
    pub connection: ConnectionState,
    pub dark_theme: bool,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            view: View::Loading,
            user: None,
            active: None,
            friends: Vec::new(),
            groups: Vec::new(),
            friend_requests: Vec::new(),
            search_results: Vec::new(),
            conversations: Vec::new(),
            group_members: Vec::new(),
            transcript: Vec::new(),
            toasts: Toasts::new(),
            connection: ConnectionState::Disconnected,
            dark_theme: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Returns the session user's id, if logged in.
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Returns true if `message` was sent by the session user.
    pub fn is_own(&self, message: &Message) -> bool {
        self.user_id() == Some(message.sender_id)
    }

    /// Returns true if a pushed message belongs to the open conversation.
    ///
    /// A friend message matches when the open friend is either party; a
    /// group message matches on group id.
    pub fn matches_active(&self, message: &IncomingMessage) -> bool {
        match (&self.active, message.kind) {
            (Some(ChatTarget::Friend(friend)), ChatKind::Friend) => {
                message.receiver_id == Some(friend.id) || message.sender_id == friend.id
            }
            (Some(ChatTarget::Group(group)), ChatKind::Group) => {
                message.group_id == Some(group.id)
            }
            _ => false,
        }
    }

    /// Returns true if a notification refers to the open conversation.
    pub fn notification_is_open(&self, notification: &MessageNotification) -> bool {
        match (&self.active, notification.kind) {
            (Some(ChatTarget::Friend(friend)), ChatKind::Friend) => {
                notification.from_user == friend.username
            }
            (Some(ChatTarget::Group(group)), ChatKind::Group) => {
                notification.group_name.as_deref() == Some(group.name.as_str())
            }
            _ => false,
        }
    }

    /// Clears everything tied to the session, keeping toasts and theme.
    pub fn clear_session(&mut self) {
        let toasts = std::mem::take(&mut self.toasts);
        let dark_theme = self.dark_theme;
        *self = AppState {
            view: View::Auth(AuthForm::Login),
            toasts,
            dark_theme,
            ..AppState::default()
        };
    }
}
