// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chat Controller
//!
//! Main entry point for driving a chat session.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::models::{ChatTarget, GroupId, User, UserId};
use crate::network::{
    ChatBackend, ClientEvent, ConnectionState, HttpBackend, NetworkError, OutgoingMessage,
    PushChannel, PushEvent, RoomRef, WebSocketChannel,
};
use crate::preferences::{PreferenceStore, Preferences};
use crate::state::{AppState, AuthForm, ToastKind, View};

use super::config::ClientConfig;
use super::error::{ChatError, ChatResult};
use super::events::{ChatEvent, EventDispatcher, EventHandler};

/// Upper bound on push events handled by one [`ChatClient::pump`] call.
const MAX_EVENTS_PER_PUMP: usize = 64;

/// Chat client controller.
///
/// Owns the application state, the REST backend and the push channel.
/// Front ends call one method per user action, call [`pump`](Self::pump)
/// and [`tick`](Self::tick) from their loop, and render from
/// [`state`](Self::state).
///
/// Failed user actions are shown as error toasts and also returned. List
/// loads only log failures and keep the previous list.
///
/// # Example
///
/// ```ignore
/// use murmur_core::{ChatClient, ClientConfig};
///
/// let mut client = ChatClient::from_config(ClientConfig::new("http://localhost:5000"))?;
/// client.bootstrap();
/// client.login("linh", "secret")?;
///
/// loop {
///     client.pump();
///     client.tick();
/// }
/// ```
pub struct ChatClient<B: ChatBackend, C: PushChannel> {
    config: ClientConfig,
    backend: B,
    channel: C,
    state: AppState,
    preferences: Option<PreferenceStore>,
    events: Arc<EventDispatcher>,
}

impl ChatClient<HttpBackend, WebSocketChannel> {
    /// Creates a client talking to a real server.
    pub fn from_config(config: ClientConfig) -> ChatResult<Self> {
        let backend = HttpBackend::new(&config)?;
        Ok(Self::new(config, backend, WebSocketChannel::new()))
    }
}

impl<B: ChatBackend, C: PushChannel> ChatClient<B, C> {
    /// Creates a client over the given backend and channel.
    pub fn new(config: ClientConfig, backend: B, channel: C) -> Self {
        ChatClient {
            config,
            backend,
            channel,
            state: AppState::new(),
            preferences: None,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    /// Loads and persists the theme preference through `store`.
    pub fn with_preferences(mut self, store: PreferenceStore) -> Self {
        self.state.dark_theme = store.load().dark_theme;
        self.preferences = Some(store);
        self
    }

    // === Accessors ===

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    // === Session ===

    /// Resumes an existing backend session if there is one.
    ///
    /// Any failure, including an unreachable server, shows the login form.
    pub fn bootstrap(&mut self) -> View {
        match self.backend.current_user() {
            Ok(user) => self.start_session(user),
            Err(e) => {
                debug!(error = %e, "no session to resume");
                self.show_auth(AuthForm::Login);
            }
        }
        self.state.view
    }

    /// Logs in with a username (or handle) and password.
    pub fn login(&mut self, username: &str, password: &str) -> ChatResult<()> {
        let result = self
            .backend
            .login(username.trim(), password.trim())
            .map_err(ChatError::from);
        let user = self.surface(result)?;
        self.toast(ToastKind::Success, "Logged in successfully!");
        self.start_session(user);
        Ok(())
    }

    /// Creates an account, then shows the login form.
    pub fn register(&mut self, username: &str, custom_id: &str, password: &str) -> ChatResult<()> {
        let result = self
            .backend
            .register(username.trim(), custom_id.trim(), password.trim())
            .map_err(ChatError::from);
        let user = self.surface(result)?;
        info!(user = %user.username, "account registered");
        self.toast(ToastKind::Success, "Registration successful! Please log in.");
        self.show_auth(AuthForm::Login);
        Ok(())
    }

    /// Ends the session and closes the channel.
    ///
    /// If the backend refuses, the session stays as it was.
    pub fn logout(&mut self) -> ChatResult<()> {
        let result = self.backend.logout().map_err(ChatError::from);
        self.surface(result)?;

        self.disconnect_channel();
        self.set_view(View::Auth(AuthForm::Login));
        self.state.clear_session();
        info!("session ended");
        self.events.dispatch(ChatEvent::SessionEnded);
        self.toast(ToastKind::Info, "Logged out!");
        Ok(())
    }

    /// Switches to the login form.
    pub fn show_login(&mut self) {
        if !self.state.is_logged_in() {
            self.set_view(View::Auth(AuthForm::Login));
        }
    }

    /// Switches to the registration form.
    pub fn show_register(&mut self) {
        if !self.state.is_logged_in() {
            self.set_view(View::Auth(AuthForm::Register));
        }
    }

    /// Uploads a new avatar picture for the session user.
    pub fn upload_avatar(&mut self, file: &Path) -> ChatResult<()> {
        let result = self.require_session().and_then(|_| {
            if file.is_file() {
                Ok(())
            } else {
                Err(ChatError::InvalidInput("Please choose an image file".into()))
            }
        });
        self.surface(result)?;

        let result = self.backend.upload_avatar(file).map_err(ChatError::from);
        let url = self.surface(result)?;
        if let Some(user) = self.state.user.as_mut() {
            user.avatar_url = Some(url);
        }
        self.toast(ToastKind::Success, "Avatar uploaded!");
        Ok(())
    }

    fn start_session(&mut self, user: User) {
        info!(user = %user.username, "session started");
        self.state.user = Some(user.clone());
        self.events.dispatch(ChatEvent::SessionStarted { user });
        self.set_view(View::Chat);

        let _ = self.load_friends();
        let _ = self.load_groups();
        let _ = self.load_friend_requests();

        self.connect_channel();
    }

    fn show_auth(&mut self, form: AuthForm) {
        self.disconnect_channel();
        self.set_view(View::Auth(form));
    }

    // === Lists ===

    /// Reloads the friend list.
    pub fn load_friends(&mut self) -> ChatResult<()> {
        match self.backend.friends() {
            Ok(friends) => {
                self.state.friends = friends;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load friends");
                Err(e.into())
            }
        }
    }

    /// Reloads the group list.
    pub fn load_groups(&mut self) -> ChatResult<()> {
        match self.backend.groups() {
            Ok(groups) => {
                self.state.groups = groups;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load groups");
                Err(e.into())
            }
        }
    }

    /// Reloads pending friend requests.
    pub fn load_friend_requests(&mut self) -> ChatResult<()> {
        match self.backend.friend_requests() {
            Ok(requests) => {
                self.state.friend_requests = requests;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load friend requests");
                Err(e.into())
            }
        }
    }

    /// Loads the direct conversations with their last message.
    pub fn load_conversations(&mut self) -> ChatResult<()> {
        match self.backend.conversations() {
            Ok(conversations) => {
                self.state.conversations = conversations;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load conversations");
                Err(e.into())
            }
        }
    }

    /// Loads the members of a group.
    pub fn load_group_members(&mut self, group_id: GroupId) -> ChatResult<()> {
        match self.backend.group_members(group_id) {
            Ok(members) => {
                self.state.group_members = members;
                Ok(())
            }
            Err(e) => {
                warn!(group_id, error = %e, "failed to load group members");
                Err(e.into())
            }
        }
    }

    // === Friends ===

    /// Searches users by name or handle. An empty query does nothing.
    pub fn search_users(&mut self, query: &str) -> ChatResult<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        let result = self.backend.search_users(query).map_err(ChatError::from);
        self.state.search_results = self.surface(result)?;
        Ok(())
    }

    /// Sends a friend request.
    pub fn send_friend_request(&mut self, user_id: UserId) -> ChatResult<()> {
        let result = self.backend.add_friend(user_id).map_err(ChatError::from);
        self.surface(result)?;
        self.toast(ToastKind::Success, "Friend request sent!");
        Ok(())
    }

    /// Accepts a friend request, then reloads friends and requests.
    pub fn accept_friend_request(&mut self, user_id: UserId) -> ChatResult<()> {
        let result = self.backend.accept_friend(user_id).map_err(ChatError::from);
        self.surface(result)?;
        self.toast(ToastKind::Success, "Friend request accepted!");
        let _ = self.load_friends();
        let _ = self.load_friend_requests();
        Ok(())
    }

    /// Dismisses a friend request.
    ///
    /// The backend has no reject endpoint, so this only reloads the list.
    pub fn reject_friend_request(&mut self, user_id: UserId) -> ChatResult<()> {
        debug!(user_id, "rejecting friend request locally");
        self.load_friend_requests()
    }

    // === Groups ===

    /// Creates a group. An empty name does nothing.
    pub fn create_group(&mut self, name: &str) -> ChatResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        let result = self.backend.create_group(name).map_err(ChatError::from);
        let group = self.surface(result)?;
        info!(group_id = group.id, "group created");
        self.toast(ToastKind::Success, "Group created!");
        let _ = self.load_groups();
        Ok(())
    }

    /// Adds a user to a group.
    pub fn add_group_member(&mut self, group_id: GroupId, user_id: UserId) -> ChatResult<()> {
        let result = self
            .backend
            .add_group_member(group_id, user_id)
            .map_err(ChatError::from);
        self.surface(result)?;
        self.toast(ToastKind::Success, "Member added!");
        self.after_membership_change(group_id);
        Ok(())
    }

    /// Removes a user from a group.
    pub fn remove_group_member(&mut self, group_id: GroupId, user_id: UserId) -> ChatResult<()> {
        let result = self
            .backend
            .remove_group_member(group_id, user_id)
            .map_err(ChatError::from);
        self.surface(result)?;
        self.toast(ToastKind::Success, "Member removed!");
        self.after_membership_change(group_id);
        Ok(())
    }

    /// Deletes a group, closing it first if it is open.
    pub fn delete_group(&mut self, group_id: GroupId) -> ChatResult<()> {
        let result = self.backend.delete_group(group_id).map_err(ChatError::from);
        self.surface(result)?;
        if self.is_active_group(group_id) {
            self.close_conversation();
        }
        self.toast(ToastKind::Success, "Group deleted!");
        let _ = self.load_groups();
        Ok(())
    }

    fn after_membership_change(&mut self, group_id: GroupId) {
        let _ = self.load_groups();
        if self.is_active_group(group_id) {
            // Keep the header's member count current.
            if let Some(group) = self.state.groups.iter().find(|g| g.id == group_id) {
                self.state.active = Some(ChatTarget::Group(group.clone()));
            }
            let _ = self.load_group_members(group_id);
        }
    }

    fn is_active_group(&self, group_id: GroupId) -> bool {
        matches!(&self.state.active, Some(ChatTarget::Group(g)) if g.id == group_id)
    }

    // === Conversations ===

    /// Opens a conversation.
    ///
    /// Leaves the previously open conversation (if any), joins the new one,
    /// then loads its history.
    pub fn open_conversation(&mut self, target: ChatTarget) -> ChatResult<()> {
        self.require_session()?;

        if let Some(previous) = self.state.active.take() {
            self.emit(ClientEvent::LeaveChat(room_of(&previous)));
        }
        self.emit(ClientEvent::JoinChat(room_of(&target)));

        let (kind, id) = (target.kind(), target.id());
        self.state.active = Some(target);
        self.state.transcript.clear();
        self.state.group_members.clear();
        self.events.dispatch(ChatEvent::ConversationOpened { kind, id });

        let _ = self.reload_messages();
        Ok(())
    }

    /// Closes the open conversation, leaving its room.
    pub fn close_conversation(&mut self) {
        if let Some(previous) = self.state.active.take() {
            self.emit(ClientEvent::LeaveChat(room_of(&previous)));
            self.state.transcript.clear();
            self.state.group_members.clear();
            self.events.dispatch(ChatEvent::ConversationClosed);
        }
    }

    /// Replaces the transcript with the open conversation's history.
    pub fn reload_messages(&mut self) -> ChatResult<()> {
        let result = match &self.state.active {
            Some(ChatTarget::Friend(friend)) => self.backend.message_history(friend.id),
            Some(ChatTarget::Group(group)) => self.backend.group_history(group.id),
            None => return Ok(()),
        };
        match result {
            Ok(messages) => {
                self.state.transcript = messages;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load messages");
                Err(e.into())
            }
        }
    }

    /// Sends a message to the open conversation over the channel.
    ///
    /// Does nothing for blank input or without an open conversation. The
    /// message shows up once the server pushes it back.
    pub fn send_message(&mut self, content: &str) -> ChatResult<()> {
        let content = content.trim();
        let target = match &self.state.active {
            Some(target) if !content.is_empty() => target,
            _ => return Ok(()),
        };
        let event = ClientEvent::SendMessage(OutgoingMessage {
            kind: target.kind(),
            id: target.id(),
            content: content.to_string(),
        });
        let result = self.try_emit(&event).map_err(ChatError::from);
        self.surface(result)
    }

    // === Push channel ===

    /// Handles pending push events. Returns how many were handled.
    ///
    /// Without a session nothing is read.
    pub fn pump(&mut self) -> usize {
        if !self.state.is_logged_in() {
            return 0;
        }
        let mut handled = 0;
        for _ in 0..MAX_EVENTS_PER_PUMP {
            match self.channel.poll() {
                Ok(Some(event)) => {
                    self.handle_push(event);
                    handled += 1;
                }
                Ok(None) => break,
                Err(NetworkError::InvalidPacket(reason)) => {
                    warn!(%reason, "skipping malformed push event");
                }
                Err(e) => {
                    warn!(error = %e, "push channel read failed");
                    break;
                }
            }
        }
        handled
    }

    /// Applies one push event to the state.
    pub fn handle_push(&mut self, event: PushEvent) {
        if !self.state.is_logged_in() {
            debug!(?event, "ignoring push event without a session");
            return;
        }
        match event {
            PushEvent::Connected => {
                info!("push channel connected");
                self.set_connection(ConnectionState::Connected);
                self.toast(ToastKind::Success, "Connected to server");
            }
            PushEvent::Disconnected => {
                warn!("push channel disconnected");
                self.set_connection(ConnectionState::Disconnected);
                self.toast(ToastKind::Error, "Disconnected from server");
            }
            PushEvent::ConnectError(reason) => {
                error!(%reason, "push channel connection error");
                self.set_connection(self.channel.state());
                self.toast(ToastKind::Error, "Connection error");
            }
            PushEvent::NewMessage(incoming) => {
                if self.state.matches_active(&incoming) {
                    let message = incoming.into_message();
                    self.state.transcript.push(message.clone());
                    self.events.dispatch(ChatEvent::MessageAppended { message });
                } else {
                    debug!(kind = %incoming.kind, "message for another conversation");
                }
            }
            PushEvent::MessageNotification(notification) => {
                if !self.state.notification_is_open(&notification) {
                    self.toast(ToastKind::Info, notification.summary());
                }
            }
        }
    }

    fn connect_channel(&mut self) {
        let config = self.config.channel_config(self.backend.session_cookie());
        if let Err(e) = self.channel.connect(&config) {
            error!(error = %e, url = %config.url, "push channel connection failed");
            self.toast(ToastKind::Error, "Connection error");
        }
        let state = self.channel.state();
        self.set_connection(state);
    }

    fn disconnect_channel(&mut self) {
        if let Err(e) = self.channel.disconnect() {
            debug!(error = %e, "channel disconnect failed");
        }
        self.set_connection(ConnectionState::Disconnected);
    }

    fn set_connection(&mut self, state: ConnectionState) {
        if self.state.connection != state {
            self.state.connection = state;
            self.events
                .dispatch(ChatEvent::ConnectionStateChanged { state });
        }
    }

    /// Emits best-effort room events; failures are only logged.
    fn emit(&mut self, event: ClientEvent) {
        if let Err(e) = self.try_emit(&event) {
            warn!(event = event.name(), error = %e, "emit failed");
        }
    }

    /// Emits an event, silently dropping it when not connected.
    fn try_emit(&mut self, event: &ClientEvent) -> Result<(), NetworkError> {
        match self.channel.emit(event) {
            Err(NetworkError::NotConnected) => {
                debug!(event = event.name(), "channel not connected, dropping emit");
                Ok(())
            }
            other => other,
        }
    }

    // === Toasts and preferences ===

    /// Drops expired toasts.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Drops toasts expired at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        self.state.toasts.expire(now);
    }

    /// Flips between light and dark theme and saves the choice.
    pub fn toggle_theme(&mut self) -> ChatResult<()> {
        self.state.dark_theme = !self.state.dark_theme;
        let preferences = Preferences {
            dark_theme: self.state.dark_theme,
        };
        let result = match &self.preferences {
            Some(store) => store.save(&preferences).map_err(ChatError::from),
            None => Ok(()),
        };
        self.surface(result)
    }

    /// Shows a toast.
    pub fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        self.state.toasts.push(kind, message.clone());
        self.events.dispatch(ChatEvent::ToastShown { kind, message });
    }

    // === Events ===

    /// Adds an event handler.
    pub fn add_event_handler(&mut self, handler: Arc<dyn EventHandler>) {
        if let Some(events) = Arc::get_mut(&mut self.events) {
            events.add_handler(handler);
        }
    }

    /// Clears all event handlers.
    pub fn clear_event_handlers(&mut self) {
        if let Some(events) = Arc::get_mut(&mut self.events) {
            events.clear_handlers();
        }
    }

    /// Returns a reference to the event dispatcher.
    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }

    fn set_view(&mut self, view: View) {
        if self.state.view != view {
            self.state.view = view;
            self.events.dispatch(ChatEvent::ViewChanged { view });
        }
    }

    fn require_session(&self) -> ChatResult<()> {
        if self.state.is_logged_in() {
            Ok(())
        } else {
            Err(ChatError::NotAuthenticated)
        }
    }

    /// Shows the error of a failed action as a toast and passes it on.
    fn surface<T>(&mut self, result: ChatResult<T>) -> ChatResult<T> {
        if let Err(e) = &result {
            self.toast(ToastKind::Error, e.to_string());
        }
        result
    }
}

fn room_of(target: &ChatTarget) -> RoomRef {
    RoomRef {
        kind: target.kind(),
        id: target.id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::network::{MockBackend, MockChannel};

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            username: name.into(),
            custom_id: name.into(),
            avatar_url: None,
        }
    }

    fn client() -> ChatClient<MockBackend, MockChannel> {
        let backend = MockBackend::new().with_account(user(1, "me"), "pw");
        ChatClient::new(ClientConfig::default(), backend, MockChannel::new())
    }

    #[test]
    fn test_send_without_conversation_is_noop() {
        let mut client = client();
        client.login("me", "pw").unwrap();
        client.send_message("hello").unwrap();
        assert!(client.channel().emitted().is_empty());
    }

    #[test]
    fn test_open_requires_session() {
        let mut client = client();
        let result = client.open_conversation(ChatTarget::Friend(user(2, "bo")));
        assert!(matches!(result, Err(ChatError::NotAuthenticated)));
    }

    #[test]
    fn test_channel_gets_session_cookie() {
        let mut client = client();
        client.login("me", "pw").unwrap();
        let config = client.channel().last_config().unwrap();
        assert_eq!(config.cookie.as_deref(), Some("session=mock-1"));
        assert!(config.url.starts_with("ws://localhost:5000/socket.io/"));
    }
}
