// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Backend and Channel
//!
//! In-memory stand-ins for the REST backend and the push channel, used to
//! drive the controller in tests without a server.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use super::channel::{ChannelConfig, ClientEvent, ConnectionState, PushChannel, PushEvent};
use super::error::{NetworkError, NetworkResult};
use super::http::ChatBackend;
use crate::models::{
    ChatKind, ConversationSummary, FriendRequest, Group, GroupId, GroupMember, Message, User,
    UserId,
};

/// In-memory chat backend.
///
/// Keeps just enough server state to answer the REST calls and records
/// every endpoint hit, in order, for assertions.
#[derive(Debug, Default)]
pub struct MockBackend {
    accounts: Vec<(User, String)>,
    session: Option<User>,
    friends: Vec<User>,
    requests: Vec<FriendRequest>,
    sent_requests: Vec<UserId>,
    groups: Vec<Group>,
    members: HashMap<GroupId, Vec<GroupMember>>,
    histories: HashMap<(ChatKind, i64), Vec<Message>>,
    conversations: Vec<ConversationSummary>,
    search_results: Vec<User>,
    failures: HashMap<&'static str, NetworkError>,
    calls: Vec<&'static str>,
    next_id: i64,
}

impl MockBackend {
    /// Creates an empty backend with no accounts.
    pub fn new() -> Self {
        MockBackend {
            next_id: 1000,
            ..Default::default()
        }
    }

    /// Adds an account that can log in.
    pub fn with_account(mut self, user: User, password: &str) -> Self {
        self.accounts.push((user, password.to_string()));
        self
    }

    /// Starts with an existing backend session, as after a page reload.
    pub fn with_session(mut self, user: User) -> Self {
        self.session = Some(user);
        self
    }

    pub fn set_friends(&mut self, friends: Vec<User>) {
        self.friends = friends;
    }

    pub fn set_friend_requests(&mut self, requests: Vec<FriendRequest>) {
        self.requests = requests;
    }

    pub fn set_groups(&mut self, groups: Vec<Group>) {
        self.groups = groups;
    }

    pub fn set_group_members(&mut self, group_id: GroupId, members: Vec<GroupMember>) {
        self.members.insert(group_id, members);
    }

    pub fn set_history(&mut self, kind: ChatKind, id: i64, messages: Vec<Message>) {
        self.histories.insert((kind, id), messages);
    }

    pub fn set_conversations(&mut self, conversations: Vec<ConversationSummary>) {
        self.conversations = conversations;
    }

    pub fn set_search_results(&mut self, users: Vec<User>) {
        self.search_results = users;
    }

    /// Makes the next call to `endpoint` fail with `error`.
    pub fn fail_next(&mut self, endpoint: &'static str, error: NetworkError) {
        self.failures.insert(endpoint, error);
    }

    /// Returns the endpoints called so far, in order.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    /// Returns how many times `endpoint` was called.
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls.iter().filter(|c| **c == endpoint).count()
    }

    /// Clears the recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Returns the user ids friend requests were sent to.
    pub fn sent_requests(&self) -> &[UserId] {
        &self.sent_requests
    }

    /// Returns the current backend session, if any.
    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn groups_snapshot(&self) -> &[Group] {
        &self.groups
    }

    fn record(&mut self, endpoint: &'static str) -> NetworkResult<()> {
        self.calls.push(endpoint);
        match self.failures.remove(endpoint) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn authed(&mut self, endpoint: &'static str) -> NetworkResult<User> {
        self.record(endpoint)?;
        self.session.clone().ok_or(NetworkError::Http {
            status: 401,
            message: "Not logged in".into(),
        })
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn group_mut(&mut self, group_id: GroupId) -> NetworkResult<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or(NetworkError::Http {
                status: 404,
                message: "Group not found".into(),
            })
    }

    fn store_message(&mut self, key: (ChatKind, i64), message: Message) -> Message {
        self.histories.entry(key).or_default().push(message.clone());
        message
    }
}

impl ChatBackend for MockBackend {
    fn register(
        &mut self,
        username: &str,
        custom_id: &str,
        password: &str,
    ) -> NetworkResult<User> {
        self.record("register")?;
        if username.is_empty() || custom_id.is_empty() || password.is_empty() {
            return Err(NetworkError::Http {
                status: 400,
                message: "Username, password and custom ID are required".into(),
            });
        }
        if self.accounts.iter().any(|(u, _)| u.username == username) {
            return Err(NetworkError::Http {
                status: 400,
                message: "Username already exists".into(),
            });
        }
        let user = User {
            id: self.next_id(),
            username: username.to_string(),
            custom_id: custom_id.to_string(),
            avatar_url: None,
        };
        self.accounts.push((user.clone(), password.to_string()));
        Ok(user)
    }

    fn login(&mut self, username: &str, password: &str) -> NetworkResult<User> {
        self.record("login")?;
        let user = self
            .accounts
            .iter()
            .find(|(u, p)| (u.username == username || u.custom_id == username) && p == password)
            .map(|(u, _)| u.clone())
            .ok_or(NetworkError::Http {
                status: 401,
                message: "Invalid username or password".into(),
            })?;
        self.session = Some(user.clone());
        Ok(user)
    }

    fn logout(&mut self) -> NetworkResult<()> {
        self.record("logout")?;
        self.session = None;
        Ok(())
    }

    fn current_user(&mut self) -> NetworkResult<User> {
        self.authed("current_user")
    }

    fn upload_avatar(&mut self, file: &Path) -> NetworkResult<String> {
        let user = self.authed("upload_avatar")?;
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(NetworkError::Http {
                status: 400,
                message: "No file selected".into(),
            })?;
        let url = format!("/uploads/avatar_{}_{}", user.id, name);
        if let Some(session) = self.session.as_mut() {
            session.avatar_url = Some(url.clone());
        }
        Ok(url)
    }

    fn search_users(&mut self, _query: &str) -> NetworkResult<Vec<User>> {
        self.authed("search_users")?;
        Ok(self.search_results.clone())
    }

    fn add_friend(&mut self, friend_id: UserId) -> NetworkResult<()> {
        let me = self.authed("add_friend")?;
        if friend_id == me.id {
            return Err(NetworkError::Http {
                status: 400,
                message: "Cannot add yourself as a friend".into(),
            });
        }
        self.sent_requests.push(friend_id);
        Ok(())
    }

    fn accept_friend(&mut self, friend_id: UserId) -> NetworkResult<()> {
        self.authed("accept_friend")?;
        let position = self
            .requests
            .iter()
            .position(|r| r.user.id == friend_id)
            .ok_or(NetworkError::Http {
                status: 404,
                message: "Friend request not found".into(),
            })?;
        let request = self.requests.remove(position);
        self.friends.push(request.user);
        Ok(())
    }

    fn friends(&mut self) -> NetworkResult<Vec<User>> {
        self.authed("friends")?;
        Ok(self.friends.clone())
    }

    fn friend_requests(&mut self) -> NetworkResult<Vec<FriendRequest>> {
        self.authed("friend_requests")?;
        Ok(self.requests.clone())
    }

    fn send_message(&mut self, receiver_id: UserId, content: &str) -> NetworkResult<Message> {
        let me = self.authed("send_message")?;
        let message = Message {
            id: Some(self.next_id()),
            sender_id: me.id,
            sender_username: Some(me.username),
            receiver_id: Some(receiver_id),
            group_id: None,
            content: content.to_string(),
            timestamp: "2024-01-01T00:00:00".into(),
        };
        Ok(self.store_message((ChatKind::Friend, receiver_id), message))
    }

    fn message_history(&mut self, friend_id: UserId) -> NetworkResult<Vec<Message>> {
        self.authed("message_history")?;
        Ok(self
            .histories
            .get(&(ChatKind::Friend, friend_id))
            .cloned()
            .unwrap_or_default())
    }

    fn conversations(&mut self) -> NetworkResult<Vec<ConversationSummary>> {
        self.authed("conversations")?;
        Ok(self.conversations.clone())
    }

    fn create_group(&mut self, name: &str) -> NetworkResult<Group> {
        let me = self.authed("create_group")?;
        let group = Group {
            id: self.next_id(),
            name: name.to_string(),
            creator_id: Some(me.id),
            member_count: 1,
        };
        self.groups.push(group.clone());
        Ok(group)
    }

    fn add_group_member(&mut self, group_id: GroupId, _user_id: UserId) -> NetworkResult<()> {
        self.authed("add_group_member")?;
        self.group_mut(group_id)?.member_count += 1;
        Ok(())
    }

    fn remove_group_member(&mut self, group_id: GroupId, _user_id: UserId) -> NetworkResult<()> {
        self.authed("remove_group_member")?;
        let group = self.group_mut(group_id)?;
        group.member_count = group.member_count.saturating_sub(1);
        Ok(())
    }

    fn delete_group(&mut self, group_id: GroupId) -> NetworkResult<()> {
        self.authed("delete_group")?;
        self.group_mut(group_id)?;
        self.groups.retain(|g| g.id != group_id);
        Ok(())
    }

    fn send_group_message(&mut self, group_id: GroupId, content: &str) -> NetworkResult<Message> {
        let me = self.authed("send_group_message")?;
        self.group_mut(group_id)?;
        let message = Message {
            id: Some(self.next_id()),
            sender_id: me.id,
            sender_username: Some(me.username),
            receiver_id: None,
            group_id: Some(group_id),
            content: content.to_string(),
            timestamp: "2024-01-01T00:00:00".into(),
        };
        Ok(self.store_message((ChatKind::Group, group_id), message))
    }

    fn group_history(&mut self, group_id: GroupId) -> NetworkResult<Vec<Message>> {
        self.authed("group_history")?;
        Ok(self
            .histories
            .get(&(ChatKind::Group, group_id))
            .cloned()
            .unwrap_or_default())
    }

    fn groups(&mut self) -> NetworkResult<Vec<Group>> {
        self.authed("groups")?;
        Ok(self.groups.clone())
    }

    fn group_members(&mut self, group_id: GroupId) -> NetworkResult<Vec<GroupMember>> {
        self.authed("group_members")?;
        Ok(self.members.get(&group_id).cloned().unwrap_or_default())
    }

    fn session_cookie(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|user| format!("session=mock-{}", user.id))
    }
}

/// In-memory push channel.
///
/// Records emitted events and replays queued push events on `poll`. Like the
/// WebSocket channel, a successful connect yields `PushEvent::Connected`
/// as the first polled event.
#[derive(Debug)]
pub struct MockChannel {
    state: ConnectionState,
    emitted: Vec<ClientEvent>,
    incoming: VecDeque<PushEvent>,
    last_config: Option<ChannelConfig>,
    fail_connect: Option<NetworkError>,
    connect_count: usize,
}

impl MockChannel {
    /// Creates a new, disconnected channel.
    pub fn new() -> Self {
        MockChannel {
            state: ConnectionState::Disconnected,
            emitted: Vec::new(),
            incoming: VecDeque::new(),
            last_config: None,
            fail_connect: None,
            connect_count: 0,
        }
    }

    /// Queues an event to be returned by `poll`.
    pub fn queue_push(&mut self, event: PushEvent) {
        self.incoming.push_back(event);
    }

    /// Returns all events emitted while connected.
    pub fn emitted(&self) -> &[ClientEvent] {
        &self.emitted
    }

    /// Clears recorded emits.
    pub fn clear_emitted(&mut self) {
        self.emitted.clear();
    }

    /// Makes the next `connect` fail with `error`.
    pub fn fail_next_connect(&mut self, error: NetworkError) {
        self.fail_connect = Some(error);
    }

    /// Returns the config of the last connect attempt.
    pub fn last_config(&self) -> Option<&ChannelConfig> {
        self.last_config.as_ref()
    }

    pub fn connect_count(&self) -> usize {
        self.connect_count
    }

    /// Number of queued events not yet polled.
    pub fn pending(&self) -> usize {
        self.incoming.len()
    }

    /// Simulates the server dropping the connection.
    pub fn drop_connection(&mut self) {
        self.state = ConnectionState::Disconnected;
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PushChannel for MockChannel {
    fn connect(&mut self, config: &ChannelConfig) -> NetworkResult<()> {
        self.connect_count += 1;
        self.last_config = Some(config.clone());
        if let Some(error) = self.fail_connect.take() {
            self.state = ConnectionState::Disconnected;
            return Err(error);
        }
        self.state = ConnectionState::Connected;
        self.incoming.push_front(PushEvent::Connected);
        Ok(())
    }

    fn disconnect(&mut self) -> NetworkResult<()> {
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn emit(&mut self, event: &ClientEvent) -> NetworkResult<()> {
        if self.state != ConnectionState::Connected {
            return Err(NetworkError::NotConnected);
        }
        self.emitted.push(event.clone());
        Ok(())
    }

    fn poll(&mut self) -> NetworkResult<Option<PushEvent>> {
        if self.state != ConnectionState::Connected {
            return Ok(None);
        }
        Ok(self.incoming.pop_front())
    }
}
