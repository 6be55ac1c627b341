// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for api::controller

mod common;

use std::time::{Duration, Instant};

use common::*;
use murmur_core::network::{OutgoingMessage, RoomRef};
use murmur_core::*;

fn room(kind: ChatKind, id: i64) -> RoomRef {
    RoomRef { kind, id }
}

// === Session ===

#[test]
fn test_bootstrap_resumes_existing_session() {
    let mut client = client(backend().with_session(me()));

    let view = client.bootstrap();

    assert_eq!(view, View::Chat);
    assert_eq!(client.state().user.as_ref().map(|u| u.id), Some(1));
    assert_eq!(client.state().friends.len(), 2);
    assert_eq!(client.state().groups.len(), 1);
    assert!(client.channel().is_connected());
}

#[test]
fn test_bootstrap_without_session_shows_login() {
    let mut client = client(backend());

    let view = client.bootstrap();

    assert_eq!(view, View::Auth(AuthForm::Login));
    assert!(client.state().user.is_none());
    assert_eq!(client.channel().connect_count(), 0);
    assert!(client.state().toasts.is_empty());
}

#[test]
fn test_bootstrap_network_failure_shows_login() {
    let mut backend = backend().with_session(me());
    backend.fail_next(
        "current_user",
        NetworkError::Request("connection refused".into()),
    );
    let mut client = client(backend);

    assert_eq!(client.bootstrap(), View::Auth(AuthForm::Login));
}

#[test]
fn test_login_success_shows_chat() {
    let mut client = client(backend());

    client.login("linh", PASSWORD).unwrap();

    assert_eq!(client.state().view, View::Chat);
    assert!(toast_messages(&client).contains(&"Logged in successfully!".to_string()));
    assert_eq!(
        client.backend().calls(),
        ["login", "friends", "groups", "friend_requests"]
    );
    assert!(client.channel().is_connected());
}

#[test]
fn test_login_trims_input() {
    let mut client = client(backend());
    client.login("  linh ", " hunter2 ").unwrap();
    assert!(client.state().is_logged_in());
}

#[test]
fn test_login_by_handle() {
    let mut client = client(backend());
    client.login("linh_id", PASSWORD).unwrap();
    assert!(client.state().is_logged_in());
}

#[test]
fn test_failed_login_stays_on_auth_with_error_toast() {
    let mut client = client(backend());
    client.bootstrap();

    let result = client.login("linh", "wrong");

    assert!(result.is_err());
    assert_eq!(client.state().view, View::Auth(AuthForm::Login));
    let toast = client.state().toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Invalid username or password");
    assert_eq!(client.channel().connect_count(), 0);
}

#[test]
fn test_register_switches_to_login_form() {
    let mut client = client(backend());
    client.bootstrap();
    client.show_register();
    assert_eq!(client.state().view, View::Auth(AuthForm::Register));

    client.register("minh", "minh01", "pw").unwrap();

    assert_eq!(client.state().view, View::Auth(AuthForm::Login));
    assert!(client.state().user.is_none());
    assert_eq!(
        client.state().toasts.latest().unwrap().message,
        "Registration successful! Please log in."
    );
}

#[test]
fn test_register_duplicate_shows_backend_message() {
    let mut client = client(backend());
    client.bootstrap();

    let result = client.register("linh", "other", "pw");

    assert!(result.is_err());
    assert_eq!(
        client.state().toasts.latest().unwrap().message,
        "Username already exists"
    );
}

#[test]
fn test_logout_clears_session_and_closes_channel() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();

    client.logout().unwrap();

    assert!(client.state().user.is_none());
    assert!(client.state().active.is_none());
    assert!(client.state().friends.is_empty());
    assert!(client.state().transcript.is_empty());
    assert_eq!(client.state().view, View::Auth(AuthForm::Login));
    assert!(!client.channel().is_connected());
    assert!(client.backend().session().is_none());
}

#[test]
fn test_push_events_ignored_after_logout() {
    let mut client = logged_in();
    client.logout().unwrap();
    let toasts_before = client.state().toasts.len();

    client.channel_mut().queue_push(PushEvent::MessageNotification(
        friend_notification("an", "hello?"),
    ));
    client.handle_push(PushEvent::MessageNotification(friend_notification(
        "an", "hello?",
    )));

    assert_eq!(client.pump(), 0);
    assert_eq!(client.state().toasts.len(), toasts_before);
}

#[test]
fn test_failed_logout_keeps_session() {
    let mut client = logged_in();
    client.backend_mut().fail_next(
        "logout",
        NetworkError::Http {
            status: 500,
            message: "HTTP error! status: 500".into(),
        },
    );

    assert!(client.logout().is_err());
    assert!(client.state().is_logged_in());
    assert!(client.channel().is_connected());
}

// === Channel ===

#[test]
fn test_connect_toast_after_login() {
    let mut client = client(backend());
    client.login("linh", PASSWORD).unwrap();

    assert_eq!(client.pump(), 1);

    assert_eq!(client.state().connection, ConnectionState::Connected);
    let toast = client.state().toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "Connected to server");
}

#[test]
fn test_disconnect_shows_error_toast() {
    let mut client = logged_in();
    client.channel_mut().queue_push(PushEvent::Disconnected);

    client.pump();

    assert_eq!(client.state().connection, ConnectionState::Disconnected);
    let toast = client.state().toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Disconnected from server");
}

#[test]
fn test_connect_error_shows_generic_toast() {
    let mut client = logged_in();
    client
        .channel_mut()
        .queue_push(PushEvent::ConnectError("Not authorized".into()));

    client.pump();

    assert_eq!(
        client.state().toasts.latest().unwrap().message,
        "Connection error"
    );
}

#[test]
fn test_failed_channel_connect_still_logs_in() {
    let mut channel = MockChannel::new();
    channel.fail_next_connect(NetworkError::ConnectionFailed("refused".into()));
    let mut client = ChatClient::new(ClientConfig::default(), backend(), channel);

    client.login("linh", PASSWORD).unwrap();

    assert_eq!(client.state().view, View::Chat);
    assert_eq!(client.state().connection, ConnectionState::Disconnected);
    assert_eq!(
        client.state().toasts.latest().unwrap().message,
        "Connection error"
    );
}

// === Conversation switching ===

#[test]
fn test_open_first_conversation_joins_only() {
    let mut client = logged_in();

    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();

    assert_eq!(
        client.channel().emitted(),
        [ClientEvent::JoinChat(room(ChatKind::Friend, 2))]
    );
}

#[test]
fn test_switching_conversation_leaves_then_joins() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();
    client.channel_mut().clear_emitted();

    client
        .open_conversation(ChatTarget::Group(group(10, "Study", 3)))
        .unwrap();

    assert_eq!(
        client.channel().emitted(),
        [
            ClientEvent::LeaveChat(room(ChatKind::Friend, 2)),
            ClientEvent::JoinChat(room(ChatKind::Group, 10)),
        ]
    );
    assert!(matches!(
        client.state().active,
        Some(ChatTarget::Group(ref g)) if g.id == 10
    ));
}

#[test]
fn test_open_conversation_loads_history() {
    let mut client = logged_in();
    client.backend_mut().set_history(
        ChatKind::Friend,
        2,
        vec![message(2, "hi"), message(1, "hey")],
    );
    client.backend_mut().set_history(
        ChatKind::Group,
        10,
        vec![message(3, "welcome")],
    );

    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();
    assert_eq!(client.state().transcript.len(), 2);

    client
        .open_conversation(ChatTarget::Group(group(10, "Study", 3)))
        .unwrap();
    assert_eq!(client.state().transcript.len(), 1);
    assert_eq!(client.state().transcript[0].content, "welcome");
    assert_eq!(client.backend().calls(), ["message_history", "group_history"]);
}

#[test]
fn test_failed_history_leaves_empty_transcript() {
    let mut client = logged_in();
    client.backend_mut().fail_next(
        "message_history",
        NetworkError::Request("timed out".into()),
    );

    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();

    assert!(client.state().transcript.is_empty());
    assert!(client.state().active.is_some());
}

#[test]
fn test_close_conversation_leaves_room() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();
    client.channel_mut().clear_emitted();

    client.close_conversation();
    client.close_conversation();

    assert!(client.state().active.is_none());
    assert_eq!(
        client.channel().emitted(),
        [ClientEvent::LeaveChat(room(ChatKind::Friend, 2))]
    );
}

#[test]
fn test_emits_dropped_when_not_connected() {
    let mut client = logged_in();
    client.channel_mut().drop_connection();

    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();
    client.send_message("hello").unwrap();

    assert!(client.channel().emitted().is_empty());
    assert!(client.state().active.is_some());
}

// === Real-time delivery ===

#[test]
fn test_matching_friend_message_appends_once() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();
    let before = client.state().transcript.len();

    client
        .channel_mut()
        .queue_push(PushEvent::NewMessage(friend_message(2, 1, "are you there")));
    client.pump();

    let transcript = &client.state().transcript;
    assert_eq!(transcript.len(), before + 1);
    let last = transcript.last().unwrap();
    assert_eq!(last.content, "are you there");
    assert_eq!(last.sender_id, 2);
}

#[test]
fn test_own_echo_appends_to_friend_chat() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();

    client.handle_push(PushEvent::NewMessage(friend_message(1, 2, "sent by me")));

    assert_eq!(client.state().transcript.len(), 1);
    assert!(client.state().is_own(&client.state().transcript[0]));
}

#[test]
fn test_matching_group_message_appends() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Group(group(10, "Study", 3)))
        .unwrap();

    client.handle_push(PushEvent::NewMessage(group_message(3, 10, "notes?")));

    assert_eq!(client.state().transcript.len(), 1);
    assert_eq!(client.state().transcript[0].group_id, Some(10));
}

#[test]
fn test_non_matching_message_is_discarded() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();

    client.handle_push(PushEvent::NewMessage(friend_message(3, 1, "from bo")));
    client.handle_push(PushEvent::NewMessage(group_message(2, 10, "group")));

    assert!(client.state().transcript.is_empty());
}

#[test]
fn test_message_without_open_conversation_is_discarded() {
    let mut client = logged_in();

    client.handle_push(PushEvent::NewMessage(friend_message(2, 1, "hi")));

    assert!(client.state().transcript.is_empty());
}

#[test]
fn test_notification_for_other_conversation_shows_toast() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();

    client
        .channel_mut()
        .queue_push(PushEvent::MessageNotification(friend_notification(
            "bo", "lunch?",
        )));
    client.pump();

    let toast = client.state().toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Info);
    assert_eq!(toast.message, "New message from bo: lunch?");
}

#[test]
fn test_group_notification_text() {
    let mut client = logged_in();

    client.handle_push(PushEvent::MessageNotification(group_notification(
        "Study", "an", "exam moved",
    )));

    assert_eq!(
        client.state().toasts.latest().unwrap().message,
        "New message in Study from an: exam moved"
    );
}

#[test]
fn test_notification_for_open_conversation_is_suppressed() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Group(group(10, "Study", 3)))
        .unwrap();
    let before = client.state().toasts.len();

    client.handle_push(PushEvent::MessageNotification(group_notification(
        "Study", "an", "exam moved",
    )));

    assert_eq!(client.state().toasts.len(), before);
}

#[test]
fn test_duplicate_notifications_are_not_merged() {
    let mut client = logged_in();
    let before = client.state().toasts.len();

    for _ in 0..2 {
        client.handle_push(PushEvent::MessageNotification(friend_notification(
            "an", "ping",
        )));
    }

    assert_eq!(client.state().toasts.len(), before + 2);
}

// === Sending ===

#[test]
fn test_send_message_emits_trimmed_content() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Group(group(10, "Study", 3)))
        .unwrap();
    client.channel_mut().clear_emitted();

    client.send_message("  see you at 5  ").unwrap();

    assert_eq!(
        client.channel().emitted(),
        [ClientEvent::SendMessage(OutgoingMessage {
            kind: ChatKind::Group,
            id: 10,
            content: "see you at 5".into(),
        })]
    );
    // Delivered only once the server pushes it back.
    assert!(client.state().transcript.is_empty());
}

#[test]
fn test_blank_message_is_not_sent() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Friend(user(2, "an")))
        .unwrap();
    client.channel_mut().clear_emitted();

    client.send_message("   ").unwrap();

    assert!(client.channel().emitted().is_empty());
}

// === Friends and groups ===

#[test]
fn test_empty_search_makes_no_request() {
    let mut client = logged_in();
    client.search_users("   ").unwrap();
    assert!(client.backend().calls().is_empty());
}

#[test]
fn test_search_stores_results() {
    let mut client = logged_in();
    client
        .backend_mut()
        .set_search_results(vec![user(7, "cy"), user(8, "dao")]);

    client.search_users("c").unwrap();

    assert_eq!(client.state().search_results.len(), 2);
}

#[test]
fn test_send_friend_request() {
    let mut client = logged_in();

    client.send_friend_request(7).unwrap();

    assert_eq!(client.backend().sent_requests(), [7]);
    assert_eq!(
        client.state().toasts.latest().unwrap().message,
        "Friend request sent!"
    );
}

#[test]
fn test_friend_request_to_self_is_rejected() {
    let mut client = logged_in();

    assert!(client.send_friend_request(1).is_err());
    assert_eq!(
        client.state().toasts.latest().unwrap().message,
        "Cannot add yourself as a friend"
    );
}

#[test]
fn test_accept_friend_request_reloads_lists() {
    let mut client = logged_in();
    client.backend_mut().set_friend_requests(vec![FriendRequest {
        user: user(7, "cy"),
        created_at: None,
    }]);
    client.load_friend_requests().unwrap();
    client.backend_mut().clear_calls();

    client.accept_friend_request(7).unwrap();

    assert_eq!(
        client.backend().calls(),
        ["accept_friend", "friends", "friend_requests"]
    );
    assert_eq!(client.state().friends.len(), 3);
    assert!(client.state().friend_requests.is_empty());
}

#[test]
fn test_reject_friend_request_only_reloads() {
    let mut client = logged_in();

    client.reject_friend_request(7).unwrap();

    assert_eq!(client.backend().calls(), ["friend_requests"]);
}

#[test]
fn test_failed_list_load_keeps_previous_list() {
    let mut client = logged_in();
    client
        .backend_mut()
        .fail_next("friends", NetworkError::Request("offline".into()));
    let toasts_before = client.state().toasts.len();

    assert!(client.load_friends().is_err());

    assert_eq!(client.state().friends.len(), 2);
    assert_eq!(client.state().toasts.len(), toasts_before);
}

#[test]
fn test_create_group_reloads_groups() {
    let mut client = logged_in();

    client.create_group(" Book club ").unwrap();

    assert_eq!(client.backend().calls(), ["create_group", "groups"]);
    assert!(client
        .state()
        .groups
        .iter()
        .any(|g| g.name == "Book club" && g.member_count == 1));
}

#[test]
fn test_create_group_with_blank_name_is_noop() {
    let mut client = logged_in();
    client.create_group("  ").unwrap();
    assert!(client.backend().calls().is_empty());
}

#[test]
fn test_add_member_refreshes_open_group() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Group(group(10, "Study", 3)))
        .unwrap();

    client.add_group_member(10, 3).unwrap();

    match &client.state().active {
        Some(ChatTarget::Group(g)) => assert_eq!(g.member_count, 4),
        other => panic!("unexpected active conversation {:?}", other),
    }
}

#[test]
fn test_delete_open_group_closes_it() {
    let mut client = logged_in();
    client
        .open_conversation(ChatTarget::Group(group(10, "Study", 3)))
        .unwrap();
    client.channel_mut().clear_emitted();

    client.delete_group(10).unwrap();

    assert!(client.state().active.is_none());
    assert!(client.state().groups.is_empty());
    assert_eq!(
        client.channel().emitted(),
        [ClientEvent::LeaveChat(room(ChatKind::Group, 10))]
    );
}

#[test]
fn test_load_group_members_and_conversations() {
    let mut client = logged_in();
    client.backend_mut().set_group_members(
        10,
        vec![GroupMember {
            user: me(),
            joined_at: None,
            is_creator: true,
        }],
    );
    client.backend_mut().set_conversations(vec![ConversationSummary {
        friend: user(2, "an"),
        last_message: Some(message(2, "bye")),
    }]);

    client.load_group_members(10).unwrap();
    client.load_conversations().unwrap();

    assert_eq!(client.state().group_members.len(), 1);
    assert_eq!(client.state().conversations.len(), 1);
}

#[test]
fn test_upload_avatar_updates_session_user() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("me.png");
    std::fs::write(&file, b"\x89PNG").unwrap();
    let mut client = logged_in();

    client.upload_avatar(&file).unwrap();

    assert_eq!(
        client.state().user.as_ref().unwrap().avatar_url.as_deref(),
        Some("/uploads/avatar_1_me.png")
    );
}

#[test]
fn test_upload_missing_file_makes_no_request() {
    let mut client = logged_in();

    assert!(client
        .upload_avatar(std::path::Path::new("/nonexistent/me.png"))
        .is_err());
    assert!(client.backend().calls().is_empty());
    assert_eq!(
        client.state().toasts.latest().unwrap().kind,
        ToastKind::Error
    );
}

// === Toasts ===

#[test]
fn test_toasts_expire_on_tick() {
    let mut client = logged_in();
    assert!(!client.state().toasts.is_empty());

    client.tick_at(Instant::now() + Duration::from_secs(4));

    assert!(client.state().toasts.is_empty());
}
