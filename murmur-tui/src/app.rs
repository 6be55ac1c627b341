// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Application State
//!
//! Screen-level state of the terminal front end. Chat state lives in the
//! wrapped [`ChatClient`]; this only tracks what the terminal needs on top.

use std::path::PathBuf;

use murmur_core::network::{ChatBackend, PushChannel};
use murmur_core::render::{self, EntryAction, Fragment, ListEntry};
use murmur_core::{ChatClient, ChatTarget, HttpBackend, ToastKind, View, WebSocketChannel};

/// Sidebar tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Friends,
    Groups,
    Requests,
    Search,
    /// Recent direct conversations.
    Recent,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Friends,
        Tab::Groups,
        Tab::Requests,
        Tab::Search,
        Tab::Recent,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Friends => "Friends",
            Tab::Groups => "Groups",
            Tab::Requests => "Requests",
            Tab::Search => "Search",
            Tab::Recent => "Recent",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Friends => Tab::Groups,
            Tab::Groups => Tab::Requests,
            Tab::Requests => Tab::Search,
            Tab::Search => Tab::Recent,
            Tab::Recent => Tab::Friends,
        }
    }
}

/// Input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// What the single-line prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Message for the open conversation.
    Compose,
    /// User search query.
    Search,
    /// Name of a new group.
    CreateGroup,
    /// Path of an avatar image.
    UploadAvatar,
    /// Friend to add to the open group.
    AddMember,
    /// Member to remove from the open group.
    RemoveMember,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Compose => "Message",
            PromptKind::Search => "Search users",
            PromptKind::CreateGroup => "New group name",
            PromptKind::UploadAvatar => "Avatar image path",
            PromptKind::AddMember => "Add friend to group (username)",
            PromptKind::RemoveMember => "Remove member (username)",
        }
    }
}

/// Focused field of the auth form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    CustomId,
    Password,
}

/// Contents of the login / registration form.
#[derive(Debug, Clone)]
pub struct AuthFormState {
    pub username: String,
    pub custom_id: String,
    pub password: String,
    pub focus: AuthField,
}

impl Default for AuthFormState {
    fn default() -> Self {
        AuthFormState {
            username: String::new(),
            custom_id: String::new(),
            password: String::new(),
            focus: AuthField::Username,
        }
    }
}

impl AuthFormState {
    /// Moves focus to the next field. The handle field is only part of the
    /// registration form.
    pub fn next_field(&mut self, register: bool) {
        self.focus = match (self.focus, register) {
            (AuthField::Username, true) => AuthField::CustomId,
            (AuthField::Username, false) => AuthField::Password,
            (AuthField::CustomId, _) => AuthField::Password,
            (AuthField::Password, _) => AuthField::Username,
        };
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Username => &mut self.username,
            AuthField::CustomId => &mut self.custom_id,
            AuthField::Password => &mut self.password,
        }
    }

    pub fn clear(&mut self) {
        *self = AuthFormState::default();
    }
}

/// Application state.
pub struct App<B: ChatBackend = HttpBackend, C: PushChannel = WebSocketChannel> {
    pub client: ChatClient<B, C>,
    pub tab: Tab,
    pub selected: usize,
    pub input_mode: InputMode,
    pub prompt: PromptKind,
    pub input_buffer: String,
    pub auth: AuthFormState,
    pub show_members: bool,
    pub show_help: bool,
}

impl<B: ChatBackend, C: PushChannel> App<B, C> {
    pub fn new(client: ChatClient<B, C>) -> Self {
        App {
            client,
            tab: Tab::Friends,
            selected: 0,
            input_mode: InputMode::Normal,
            prompt: PromptKind::Compose,
            input_buffer: String::new(),
            auth: AuthFormState::default(),
            show_members: false,
            show_help: false,
        }
    }

    pub fn view(&self) -> View {
        self.client.state().view
    }

    /// Entries of the current sidebar tab.
    pub fn entries(&self) -> Fragment<ListEntry> {
        let state = self.client.state();
        match self.tab {
            Tab::Friends => render::friend_list(&state.friends, state.active.as_ref()),
            Tab::Groups => render::group_list(&state.groups, state.active.as_ref()),
            Tab::Requests => render::friend_request_list(&state.friend_requests),
            Tab::Search => render::search_results(&state.search_results),
            Tab::Recent => {
                render::conversation_list(&state.conversations, state.active.as_ref())
            }
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selected = 0;
        if tab == Tab::Recent && self.client.state().is_logged_in() {
            // Failures keep the previous list.
            let _ = self.client.load_conversations();
        }
    }

    pub fn next_tab(&mut self) {
        self.set_tab(self.tab.next());
    }

    pub fn select_next(&mut self) {
        let len = self.entries().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn selected_entry(&self) -> Option<ListEntry> {
        self.entries().items().get(self.selected).cloned()
    }

    /// Runs the primary action of the selected entry.
    pub fn activate_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let Some(action) = entry.actions.first().cloned() else {
            return;
        };
        // Failures are already shown as toasts.
        let _ = match action {
            EntryAction::OpenChat(target) => {
                self.show_members = false;
                self.client.open_conversation(target)
            }
            EntryAction::AcceptRequest(id) => self.client.accept_friend_request(id),
            EntryAction::RejectRequest(id) => self.client.reject_friend_request(id),
            EntryAction::AddFriend(id) => self.client.send_friend_request(id),
        };
        self.clamp_selection();
    }

    /// Rejects the selected friend request.
    pub fn reject_selected(&mut self) {
        let reject = self.selected_entry().and_then(|entry| {
            entry.actions.into_iter().find_map(|action| match action {
                EntryAction::RejectRequest(id) => Some(id),
                _ => None,
            })
        });
        if let Some(id) = reject {
            let _ = self.client.reject_friend_request(id);
            self.clamp_selection();
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.entries().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Opens the prompt for `kind`.
    pub fn start_prompt(&mut self, kind: PromptKind) {
        self.prompt = kind;
        self.input_buffer.clear();
        self.input_mode = InputMode::Editing;
    }

    pub fn cancel_prompt(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Submits the prompt. Compose stays open for the next message.
    pub fn submit_prompt(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        let _ = match self.prompt {
            PromptKind::Compose => self.client.send_message(&input),
            PromptKind::Search => {
                self.set_tab(Tab::Search);
                self.client.search_users(&input)
            }
            PromptKind::CreateGroup => self.client.create_group(&input),
            PromptKind::UploadAvatar => self.client.upload_avatar(&PathBuf::from(input.trim())),
            PromptKind::AddMember => self.add_member(input.trim()),
            PromptKind::RemoveMember => self.remove_member(input.trim()),
        };
        if self.prompt != PromptKind::Compose {
            self.input_mode = InputMode::Normal;
        }
    }

    fn open_group_id(&self) -> Option<i64> {
        match &self.client.state().active {
            Some(ChatTarget::Group(group)) => Some(group.id),
            _ => None,
        }
    }

    fn add_member(&mut self, name: &str) -> murmur_core::ChatResult<()> {
        let Some(group_id) = self.open_group_id() else {
            return Ok(());
        };
        let friend = self
            .client
            .state()
            .friends
            .iter()
            .find(|f| f.username == name || f.custom_id == name)
            .map(|f| f.id);
        match friend {
            Some(user_id) => self.client.add_group_member(group_id, user_id),
            None => {
                self.client
                    .toast(ToastKind::Error, format!("No friend named {}", name));
                Ok(())
            }
        }
    }

    fn remove_member(&mut self, name: &str) -> murmur_core::ChatResult<()> {
        let Some(group_id) = self.open_group_id() else {
            return Ok(());
        };
        if self.client.state().group_members.is_empty() {
            let _ = self.client.load_group_members(group_id);
        }
        let member = self
            .client
            .state()
            .group_members
            .iter()
            .find(|m| m.user.username == name || m.user.custom_id == name)
            .map(|m| m.user.id);
        match member {
            Some(user_id) => self.client.remove_group_member(group_id, user_id),
            None => {
                self.client
                    .toast(ToastKind::Error, format!("No member named {}", name));
                Ok(())
            }
        }
    }

    /// Shows or hides the member list of the open group.
    pub fn toggle_members(&mut self) {
        if let Some(group_id) = self.open_group_id() {
            self.show_members = !self.show_members;
            if self.show_members {
                let _ = self.client.load_group_members(group_id);
            }
        }
    }

    /// Deletes the open group.
    pub fn delete_open_group(&mut self) {
        if let Some(group_id) = self.open_group_id() {
            self.show_members = false;
            let _ = self.client.delete_group(group_id);
            self.clamp_selection();
        }
    }

    /// Submits the login or registration form.
    pub fn submit_auth(&mut self) {
        let result = match self.view() {
            View::Auth(murmur_core::AuthForm::Register) => self.client.register(
                &self.auth.username,
                &self.auth.custom_id,
                &self.auth.password,
            ),
            _ => self.client.login(&self.auth.username, &self.auth.password),
        };
        if result.is_ok() {
            self.auth.clear();
            self.set_tab(Tab::Friends);
        }
    }

    /// Switches between the login and registration forms.
    pub fn toggle_auth_form(&mut self) {
        match self.view() {
            View::Auth(murmur_core::AuthForm::Login) => self.client.show_register(),
            _ => self.client.show_login(),
        }
        self.auth.focus = AuthField::Username;
    }

    pub fn logout(&mut self) {
        if self.client.logout().is_ok() {
            self.input_mode = InputMode::Normal;
            self.show_members = false;
            self.set_tab(Tab::Friends);
        }
    }
}
