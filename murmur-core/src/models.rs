// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Domain Records
//!
//! Records exchanged with the chat backend, plus the conversation
//! reference used to track which chat is open.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend identifier of a user.
pub type UserId = i64;

/// Backend identifier of a group.
pub type GroupId = i64;

/// A registered user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// User-chosen handle, shown as `@handle`.
    pub custom_id: String,
    /// Avatar path on the backend, if one was uploaded.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Returns the handle with its `@` prefix.
    pub fn handle(&self) -> String {
        format!("@{}", self.custom_id)
    }
}

/// A chat group the current user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub creator_id: Option<UserId>,
    /// Only filled in by the group list endpoint.
    #[serde(default)]
    pub member_count: u32,
}

/// A pending friend request addressed to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    /// The user who sent the request.
    pub user: User,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A member entry from the group member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub is_creator: bool,
}

/// A chat message, direct or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<i64>,
    pub sender_id: UserId,
    #[serde(default)]
    pub sender_username: Option<String>,
    #[serde(default)]
    pub receiver_id: Option<UserId>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    pub content: String,
    /// ISO-8601 timestamp as produced by the backend.
    pub timestamp: String,
}

/// A direct conversation with its most recent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub friend: User,
    #[serde(default)]
    pub last_message: Option<Message>,
}

/// Kind of conversation, as tagged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Friend,
    Group,
}

impl ChatKind {
    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Friend => "friend",
            ChatKind::Group => "group",
        }
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a conversation that can be opened in the transcript pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    /// Direct chat with a friend.
    Friend(User),
    /// Group chat.
    Group(Group),
}

impl ChatTarget {
    pub fn kind(&self) -> ChatKind {
        match self {
            ChatTarget::Friend(_) => ChatKind::Friend,
            ChatTarget::Group(_) => ChatKind::Group,
        }
    }

    /// Returns the peer or group identifier.
    pub fn id(&self) -> i64 {
        match self {
            ChatTarget::Friend(user) => user.id,
            ChatTarget::Group(group) => group.id,
        }
    }

    /// Returns the name shown in the conversation header.
    pub fn title(&self) -> &str {
        match self {
            ChatTarget::Friend(user) => &user.username,
            ChatTarget::Group(group) => &group.name,
        }
    }

    /// Returns true if this reference points at the given conversation.
    pub fn is(&self, kind: ChatKind, id: i64) -> bool {
        self.kind() == kind && self.id() == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_without_avatar() {
        let user: User =
            serde_json::from_str(r#"{"id": 3, "username": "linh", "custom_id": "linh01"}"#)
                .unwrap();
        assert_eq!(user.avatar_url, None);
        assert_eq!(user.handle(), "@linh01");
    }

    #[test]
    fn test_group_member_flattens_user_fields() {
        let member: GroupMember = serde_json::from_str(
            r#"{"id": 1, "username": "an", "custom_id": "an", "avatar_url": null,
                "joined_at": "2024-01-01T10:00:00", "is_creator": true}"#,
        )
        .unwrap();
        assert_eq!(member.user.username, "an");
        assert!(member.is_creator);
    }

    #[test]
    fn test_chat_kind_wire_tag() {
        assert_eq!(serde_json::to_string(&ChatKind::Group).unwrap(), "\"group\"");
        let kind: ChatKind = serde_json::from_str("\"friend\"").unwrap();
        assert_eq!(kind, ChatKind::Friend);
    }

    #[test]
    fn test_chat_target_identity() {
        let target = ChatTarget::Group(Group {
            id: 9,
            name: "Study".into(),
            creator_id: Some(1),
            member_count: 4,
        });
        assert!(target.is(ChatKind::Group, 9));
        assert!(!target.is(ChatKind::Friend, 9));
        assert_eq!(target.title(), "Study");
    }
}
