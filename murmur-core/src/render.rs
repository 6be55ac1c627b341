// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Render Functions
//!
//! Pure projections from client state into display fragments. Every call
//! produces the complete contents of its container; front ends replace what
//! they showed before instead of diffing.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::models::{
    ChatTarget, ConversationSummary, FriendRequest, Group, GroupMember, Message, User, UserId,
};

/// Placeholder of an empty friend-request list.
pub const NO_FRIEND_REQUESTS: &str = "No friend requests";
/// Placeholder of an empty search result.
pub const NO_USERS_FOUND: &str = "No users found";
/// Placeholder of an empty conversation list.
pub const NO_CONVERSATIONS: &str = "No conversations yet";

/// Contents of one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<T> {
    /// Entries in display order.
    Items(Vec<T>),
    /// Text shown in place of an empty list.
    Placeholder(&'static str),
}

impl<T> Fragment<T> {
    fn or_placeholder(items: Vec<T>, placeholder: &'static str) -> Self {
        if items.is_empty() {
            Fragment::Placeholder(placeholder)
        } else {
            Fragment::Items(items)
        }
    }

    /// Returns the entries, empty for a placeholder.
    pub fn items(&self) -> &[T] {
        match self {
            Fragment::Items(items) => items,
            Fragment::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Fragment::Placeholder(text) => Some(*text),
            Fragment::Items(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// Avatar shown next to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    /// Uploaded picture.
    Image(String),
    /// Generic person icon.
    User,
    /// Generic group icon.
    Group,
}

impl Avatar {
    fn for_user(user: &User) -> Self {
        match &user.avatar_url {
            Some(url) if !url.is_empty() => Avatar::Image(url.clone()),
            _ => Avatar::User,
        }
    }
}

/// What selecting an entry (or one of its buttons) does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    OpenChat(ChatTarget),
    AcceptRequest(UserId),
    RejectRequest(UserId),
    AddFriend(UserId),
}

/// A row of a sidebar list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub title: String,
    pub subtitle: String,
    pub avatar: Avatar,
    /// Highlighted as the open conversation.
    pub active: bool,
    pub actions: Vec<EntryAction>,
}

/// A rendered transcript message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub sender: String,
    pub content: String,
    /// `HH:MM`
    pub time: String,
    /// Sent by the session user.
    pub own: bool,
}

/// Title bar of the open conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHeader {
    pub title: String,
    pub status: String,
    pub avatar: Avatar,
}

/// Name, handle and avatar of the session user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHeader {
    pub name: String,
    pub handle: String,
    pub avatar: Avatar,
}

fn is_active_friend(active: Option<&ChatTarget>, friend: &User) -> bool {
    matches!(active, Some(ChatTarget::Friend(open)) if open.id == friend.id)
}

fn is_active_group(active: Option<&ChatTarget>, group: &Group) -> bool {
    matches!(active, Some(ChatTarget::Group(open)) if open.id == group.id)
}

fn members_label(count: u32) -> String {
    if count == 1 {
        "1 member".to_string()
    } else {
        format!("{} members", count)
    }
}

/// Renders the friend list.
pub fn friend_list(friends: &[User], active: Option<&ChatTarget>) -> Fragment<ListEntry> {
    Fragment::Items(
        friends
            .iter()
            .map(|friend| ListEntry {
                title: friend.username.clone(),
                subtitle: friend.handle(),
                avatar: Avatar::for_user(friend),
                active: is_active_friend(active, friend),
                actions: vec![EntryAction::OpenChat(ChatTarget::Friend(friend.clone()))],
            })
            .collect(),
    )
}

/// Renders pending friend requests with accept and reject actions.
pub fn friend_request_list(requests: &[FriendRequest]) -> Fragment<ListEntry> {
    let items = requests
        .iter()
        .map(|request| ListEntry {
            title: request.user.username.clone(),
            subtitle: request.user.handle(),
            avatar: Avatar::for_user(&request.user),
            active: false,
            actions: vec![
                EntryAction::AcceptRequest(request.user.id),
                EntryAction::RejectRequest(request.user.id),
            ],
        })
        .collect();
    Fragment::or_placeholder(items, NO_FRIEND_REQUESTS)
}

/// Renders the group list.
pub fn group_list(groups: &[Group], active: Option<&ChatTarget>) -> Fragment<ListEntry> {
    Fragment::Items(
        groups
            .iter()
            .map(|group| ListEntry {
                title: group.name.clone(),
                subtitle: members_label(group.member_count),
                avatar: Avatar::Group,
                active: is_active_group(active, group),
                actions: vec![EntryAction::OpenChat(ChatTarget::Group(group.clone()))],
            })
            .collect(),
    )
}

/// Renders user search results with an add-friend action.
pub fn search_results(users: &[User]) -> Fragment<ListEntry> {
    let items = users
        .iter()
        .map(|user| ListEntry {
            title: user.username.clone(),
            subtitle: user.handle(),
            avatar: Avatar::for_user(user),
            active: false,
            actions: vec![EntryAction::AddFriend(user.id)],
        })
        .collect();
    Fragment::or_placeholder(items, NO_USERS_FOUND)
}

/// Renders recent direct conversations, newest first as the backend
/// returns them. The subtitle previews the last message.
pub fn conversation_list(
    conversations: &[ConversationSummary],
    active: Option<&ChatTarget>,
) -> Fragment<ListEntry> {
    let items = conversations
        .iter()
        .map(|conversation| {
            let friend = &conversation.friend;
            let subtitle = match &conversation.last_message {
                Some(last) => format!("{} {}", format_time(&last.timestamp), last.content),
                None => friend.handle(),
            };
            ListEntry {
                title: friend.username.clone(),
                subtitle,
                avatar: Avatar::for_user(friend),
                active: is_active_friend(active, friend),
                actions: vec![EntryAction::OpenChat(ChatTarget::Friend(friend.clone()))],
            }
        })
        .collect();
    Fragment::or_placeholder(items, NO_CONVERSATIONS)
}

/// Renders members of a group, marking its creator.
pub fn group_member_list(members: &[GroupMember]) -> Fragment<ListEntry> {
    Fragment::Items(
        members
            .iter()
            .map(|member| ListEntry {
                title: member.user.username.clone(),
                subtitle: if member.is_creator {
                    format!("{} (creator)", member.user.handle())
                } else {
                    member.user.handle()
                },
                avatar: Avatar::for_user(&member.user),
                active: false,
                actions: Vec::new(),
            })
            .collect(),
    )
}

/// Renders a transcript. `me` is the session user's id.
pub fn transcript(messages: &[Message], me: Option<UserId>) -> Fragment<TranscriptLine> {
    Fragment::Items(
        messages
            .iter()
            .map(|message| transcript_line(message, me))
            .collect(),
    )
}

/// Renders a single transcript message.
pub fn transcript_line(message: &Message, me: Option<UserId>) -> TranscriptLine {
    let own = me == Some(message.sender_id);
    TranscriptLine {
        sender: message
            .sender_username
            .clone()
            .unwrap_or_else(|| if own { "You".into() } else { String::new() }),
        content: message.content.clone(),
        time: format_time(&message.timestamp),
        own,
    }
}

/// Renders the header of an open conversation.
pub fn conversation_header(target: &ChatTarget) -> ConversationHeader {
    match target {
        ChatTarget::Friend(friend) => ConversationHeader {
            title: friend.username.clone(),
            status: "Online".to_string(),
            avatar: Avatar::for_user(friend),
        },
        ChatTarget::Group(group) => ConversationHeader {
            title: group.name.clone(),
            status: members_label(group.member_count),
            avatar: Avatar::Group,
        },
    }
}

/// Renders the session user's header.
pub fn session_header(user: &User) -> SessionHeader {
    SessionHeader {
        name: user.username.clone(),
        handle: user.handle(),
        avatar: Avatar::for_user(user),
    }
}

/// Formats a backend timestamp as local `HH:MM`.
pub fn format_time(timestamp: &str) -> String {
    format_time_in(timestamp, &Local)
}

/// Formats a backend timestamp as `HH:MM` in `tz`.
///
/// Timestamps without an offset are shown as written. Unparseable input
/// yields `--:--`.
pub fn format_time_in<Tz>(timestamp: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(tz).format("%H:%M").to_string();
    }
    match timestamp.parse::<NaiveDateTime>() {
        Ok(naive) => naive.format("%H:%M").to_string(),
        Err(_) => "--:--".to_string(),
    }
}
