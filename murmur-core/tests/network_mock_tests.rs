// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for network::mock

mod common;

use common::*;
use murmur_core::network::RoomRef;
use murmur_core::*;

#[test]
fn test_mock_channel_connect_disconnect() {
    let mut channel = MockChannel::new();
    assert_eq!(channel.state(), ConnectionState::Disconnected);

    channel.connect(&ChannelConfig::default()).unwrap();
    assert_eq!(channel.state(), ConnectionState::Connected);
    assert_eq!(channel.poll().unwrap(), Some(PushEvent::Connected));

    channel.disconnect().unwrap();
    assert_eq!(channel.state(), ConnectionState::Disconnected);
}

#[test]
fn test_mock_channel_replays_in_order() {
    let mut channel = MockChannel::new();
    channel.queue_push(PushEvent::Disconnected);
    channel.connect(&ChannelConfig::default()).unwrap();

    assert_eq!(channel.poll().unwrap(), Some(PushEvent::Connected));
    assert_eq!(channel.poll().unwrap(), Some(PushEvent::Disconnected));
    assert_eq!(channel.poll().unwrap(), None);
}

#[test]
fn test_mock_channel_emit_requires_connection() {
    let mut channel = MockChannel::new();
    let event = ClientEvent::JoinChat(RoomRef {
        kind: ChatKind::Friend,
        id: 2,
    });

    assert_eq!(channel.emit(&event), Err(NetworkError::NotConnected));

    channel.connect(&ChannelConfig::default()).unwrap();
    channel.emit(&event).unwrap();
    assert_eq!(channel.emitted(), [event]);
}

#[test]
fn test_mock_channel_connect_failure() {
    let mut channel = MockChannel::new();
    channel.fail_next_connect(NetworkError::ConnectionFailed("refused".into()));

    assert!(channel.connect(&ChannelConfig::default()).is_err());
    assert!(!channel.is_connected());
    assert_eq!(channel.pending(), 0);
}

#[test]
fn test_mock_backend_login_sets_session() {
    let mut backend = backend();

    assert!(backend.current_user().is_err());
    let user = backend.login("linh", PASSWORD).unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(backend.current_user().unwrap(), user);
    assert!(backend.session_cookie().is_some());
}

#[test]
fn test_mock_backend_requires_session() {
    let mut backend = backend();

    let err = backend.friends().unwrap_err();

    assert_eq!(
        err,
        NetworkError::Http {
            status: 401,
            message: "Not logged in".into()
        }
    );
}

#[test]
fn test_mock_backend_injected_failure_is_one_shot() {
    let mut backend = backend().with_session(me());
    backend.fail_next("groups", NetworkError::status(502));

    assert_eq!(
        backend.groups().unwrap_err().to_string(),
        "HTTP error! status: 502"
    );
    assert_eq!(backend.groups().unwrap().len(), 1);
    assert_eq!(backend.call_count("groups"), 2);
}

#[test]
fn test_mock_backend_group_messages_extend_history() {
    let mut backend = backend().with_session(me());

    let sent = backend.send_group_message(10, "hello").unwrap();

    assert_eq!(sent.group_id, Some(10));
    assert_eq!(backend.group_history(10).unwrap(), vec![sent]);
    assert!(backend.send_group_message(99, "lost").is_err());
}
