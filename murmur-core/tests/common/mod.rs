// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use murmur_core::network::{IncomingMessage, MessageNotification};
use murmur_core::*;

pub const PASSWORD: &str = "hunter2";

pub fn user(id: UserId, name: &str) -> User {
    User {
        id,
        username: name.to_string(),
        custom_id: format!("{}_id", name),
        avatar_url: None,
    }
}

pub fn me() -> User {
    user(1, "linh")
}

pub fn group(id: GroupId, name: &str, member_count: u32) -> Group {
    Group {
        id,
        name: name.to_string(),
        creator_id: Some(1),
        member_count,
    }
}

pub fn message(sender_id: UserId, content: &str) -> Message {
    Message {
        id: None,
        sender_id,
        sender_username: None,
        receiver_id: None,
        group_id: None,
        content: content.to_string(),
        timestamp: "2024-05-01T08:30:00".to_string(),
    }
}

pub fn friend_message(sender_id: UserId, receiver_id: UserId, content: &str) -> IncomingMessage {
    IncomingMessage {
        kind: ChatKind::Friend,
        id: Some(100),
        sender_id,
        sender_username: None,
        receiver_id: Some(receiver_id),
        group_id: None,
        content: content.to_string(),
        timestamp: "2024-05-01T08:31:00".to_string(),
    }
}

pub fn group_message(sender_id: UserId, group_id: GroupId, content: &str) -> IncomingMessage {
    IncomingMessage {
        kind: ChatKind::Group,
        id: Some(200),
        sender_id,
        sender_username: None,
        receiver_id: None,
        group_id: Some(group_id),
        content: content.to_string(),
        timestamp: "2024-05-01T08:32:00".to_string(),
    }
}

pub fn friend_notification(from_user: &str, content: &str) -> MessageNotification {
    MessageNotification {
        kind: ChatKind::Friend,
        from_user: from_user.to_string(),
        content: content.to_string(),
        group_name: None,
    }
}

pub fn group_notification(group_name: &str, from_user: &str, content: &str) -> MessageNotification {
    MessageNotification {
        kind: ChatKind::Group,
        from_user: from_user.to_string(),
        content: content.to_string(),
        group_name: Some(group_name.to_string()),
    }
}

/// Backend with one account (`linh` / [`PASSWORD`]), two friends and a group.
pub fn backend() -> MockBackend {
    let mut backend = MockBackend::new().with_account(me(), PASSWORD);
    backend.set_friends(vec![user(2, "an"), user(3, "bo")]);
    backend.set_groups(vec![group(10, "Study", 3)]);
    backend
}

pub fn client(backend: MockBackend) -> ChatClient<MockBackend, MockChannel> {
    ChatClient::new(ClientConfig::default(), backend, MockChannel::new())
}

/// Logged-in client with the connect toast already pumped and the call log
/// and emits cleared.
pub fn logged_in() -> ChatClient<MockBackend, MockChannel> {
    let mut client = client(backend());
    client.login("linh", PASSWORD).expect("login");
    client.pump();
    client.backend_mut().clear_calls();
    client.channel_mut().clear_emitted();
    client
}

pub fn toast_messages(client: &ChatClient<MockBackend, MockChannel>) -> Vec<String> {
    client
        .state()
        .toasts
        .iter()
        .map(|t| t.message.clone())
        .collect()
}
