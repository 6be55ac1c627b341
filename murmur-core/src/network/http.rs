// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! REST Backend
//!
//! JSON request helper over the backend's REST endpoints. Each call is a
//! single attempt: no retry and no backoff.

use std::path::Path;
use std::sync::Arc;

use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};
use url::Url;

use super::error::{NetworkError, NetworkResult};
use crate::api::ClientConfig;
use crate::models::{
    ConversationSummary, FriendRequest, Group, GroupId, GroupMember, Message, User, UserId,
};

/// Backend trait for the chat REST API.
///
/// Abstracts the HTTP client so the controller can run against an
/// in-memory backend in tests.
pub trait ChatBackend {
    /// Creates an account. Does not sign in.
    fn register(&mut self, username: &str, custom_id: &str, password: &str)
        -> NetworkResult<User>;

    /// Signs in by username or handle.
    fn login(&mut self, username: &str, password: &str) -> NetworkResult<User>;

    /// Ends the backend session.
    fn logout(&mut self) -> NetworkResult<()>;

    /// Returns the user of the current backend session.
    fn current_user(&mut self) -> NetworkResult<User>;

    /// Uploads an avatar image and returns its new URL.
    fn upload_avatar(&mut self, file: &Path) -> NetworkResult<String>;

    /// Searches users by name or handle.
    fn search_users(&mut self, query: &str) -> NetworkResult<Vec<User>>;

    /// Sends a friend request.
    fn add_friend(&mut self, friend_id: UserId) -> NetworkResult<()>;

    /// Accepts a pending friend request from `friend_id`.
    fn accept_friend(&mut self, friend_id: UserId) -> NetworkResult<()>;

    fn friends(&mut self) -> NetworkResult<Vec<User>>;

    fn friend_requests(&mut self) -> NetworkResult<Vec<FriendRequest>>;

    /// Stores a direct message without pushing it to the channel.
    fn send_message(&mut self, receiver_id: UserId, content: &str) -> NetworkResult<Message>;

    fn message_history(&mut self, friend_id: UserId) -> NetworkResult<Vec<Message>>;

    fn conversations(&mut self) -> NetworkResult<Vec<ConversationSummary>>;

    fn create_group(&mut self, name: &str) -> NetworkResult<Group>;

    fn add_group_member(&mut self, group_id: GroupId, user_id: UserId) -> NetworkResult<()>;

    fn remove_group_member(&mut self, group_id: GroupId, user_id: UserId) -> NetworkResult<()>;

    /// Deletes a group. Only its creator may do this.
    fn delete_group(&mut self, group_id: GroupId) -> NetworkResult<()>;

    /// Stores a group message without pushing it to the channel.
    fn send_group_message(&mut self, group_id: GroupId, content: &str) -> NetworkResult<Message>;

    fn group_history(&mut self, group_id: GroupId) -> NetworkResult<Vec<Message>>;

    fn groups(&mut self) -> NetworkResult<Vec<Group>>;

    fn group_members(&mut self, group_id: GroupId) -> NetworkResult<Vec<GroupMember>>;

    /// Returns the `Cookie` header value carrying the backend session, if any.
    fn session_cookie(&self) -> Option<String>;
}

#[derive(Deserialize)]
struct UserBody {
    user: User,
}

#[derive(Deserialize)]
struct UsersBody {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct FriendsBody {
    friends: Vec<User>,
}

#[derive(Deserialize)]
struct RequestsBody {
    requests: Vec<FriendRequest>,
}

#[derive(Deserialize)]
struct MessageBody {
    data: Message,
}

#[derive(Deserialize)]
struct MessagesBody {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct ConversationsBody {
    conversations: Vec<ConversationSummary>,
}

#[derive(Deserialize)]
struct GroupBody {
    group: Group,
}

#[derive(Deserialize)]
struct GroupsBody {
    groups: Vec<Group>,
}

#[derive(Deserialize)]
struct MembersBody {
    members: Vec<GroupMember>,
}

#[derive(Deserialize)]
struct AvatarBody {
    avatar_url: String,
}

/// Turns a status code and parsed body into a result.
///
/// Non-success statuses, and bodies flagged `"success": false`, become
/// errors carrying the backend's `error` text when it has one.
fn check_response(status: u16, body: Value, fallback: Option<&str>) -> NetworkResult<Value> {
    let flagged_failure = body.get("success").and_then(Value::as_bool) == Some(false);
    if (200..300).contains(&status) && !flagged_failure {
        return Ok(body);
    }

    let message = body.get("error").and_then(Value::as_str).map(str::to_string);
    match (message, fallback) {
        (Some(message), _) => Err(NetworkError::Http { status, message }),
        (None, Some(fallback)) => Err(NetworkError::Http {
            status,
            message: fallback.to_string(),
        }),
        (None, None) => Err(NetworkError::status(status)),
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> NetworkResult<T> {
    Ok(serde_json::from_value(body)?)
}

/// HTTP implementation of [`ChatBackend`].
///
/// The backend tracks sessions with a cookie; the client keeps it in a
/// jar so the push channel can present the same session.
pub struct HttpBackend {
    client: Client,
    jar: Arc<Jar>,
    api_base: Url,
}

impl HttpBackend {
    /// Creates a backend client from config.
    pub fn new(config: &ClientConfig) -> NetworkResult<Self> {
        let api_base = Url::parse(&config.api_base_url())
            .map_err(|e| NetworkError::Request(format!("invalid server URL: {}", e)))?;
        let jar = Arc::new(Jar::default());

        let client = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            jar,
            api_base,
        })
    }

    /// Returns the API root URL.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.as_str().trim_end_matches('/'), path)
    }

    fn send(&self, request: RequestBuilder, fallback: Option<&str>) -> NetworkResult<Value> {
        let response = request.send().map_err(|e| {
            error!(error = %e, "API error");
            NetworkError::from(e)
        })?;
        let status = response.status().as_u16();
        let text = response.text()?;
        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            // Error pages are often HTML; report the status instead.
            Err(_) if !(200..300).contains(&status) => Value::Null,
            Err(e) => {
                error!(status, error = %e, "API error: body is not JSON");
                return Err(NetworkError::InvalidResponse(e.to_string()));
            }
        };
        check_response(status, body, fallback).inspect_err(|e| {
            debug!(status, error = %e, "API call rejected");
        })
    }

    /// Performs a JSON call and decodes the response body.
    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> NetworkResult<T> {
        debug!(%method, path, "API request");
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        decode(self.send(request, None)?)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> NetworkResult<T> {
        debug!(path, "API request");
        let request = self.client.get(self.url(path)).query(query);
        decode(self.send(request, None)?)
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> NetworkResult<T> {
        self.request(Method::POST, path, Some(body))
    }
}

impl ChatBackend for HttpBackend {
    fn register(
        &mut self,
        username: &str,
        custom_id: &str,
        password: &str,
    ) -> NetworkResult<User> {
        let body: UserBody = self.post(
            "/auth/register",
            json!({ "username": username, "custom_id": custom_id, "password": password }),
        )?;
        Ok(body.user)
    }

    fn login(&mut self, username: &str, password: &str) -> NetworkResult<User> {
        let body: UserBody = self.post(
            "/auth/login",
            json!({ "username": username, "password": password }),
        )?;
        Ok(body.user)
    }

    fn logout(&mut self) -> NetworkResult<()> {
        let _: Value = self.request(Method::POST, "/auth/logout", None)?;
        Ok(())
    }

    fn current_user(&mut self) -> NetworkResult<User> {
        let body: UserBody = self.get("/auth/me", &[])?;
        Ok(body.user)
    }

    fn upload_avatar(&mut self, file: &Path) -> NetworkResult<String> {
        let form = multipart::Form::new()
            .file("avatar", file)
            .map_err(|e| NetworkError::Request(format!("cannot read {}: {}", file.display(), e)))?;
        let request = self.client.post(self.url("/auth/upload_avatar")).multipart(form);
        let body: AvatarBody = decode(self.send(request, Some("Upload failed"))?)?;
        Ok(body.avatar_url)
    }

    fn search_users(&mut self, query: &str) -> NetworkResult<Vec<User>> {
        let body: UsersBody = self.get("/users/search", &[("q", query.to_string())])?;
        Ok(body.users)
    }

    fn add_friend(&mut self, friend_id: UserId) -> NetworkResult<()> {
        let _: Value = self.post("/users/add_friend", json!({ "friend_id": friend_id }))?;
        Ok(())
    }

    fn accept_friend(&mut self, friend_id: UserId) -> NetworkResult<()> {
        let _: Value = self.post("/users/accept_friend", json!({ "friend_id": friend_id }))?;
        Ok(())
    }

    fn friends(&mut self) -> NetworkResult<Vec<User>> {
        let body: FriendsBody = self.get("/users/friends", &[])?;
        Ok(body.friends)
    }

    fn friend_requests(&mut self) -> NetworkResult<Vec<FriendRequest>> {
        let body: RequestsBody = self.get("/users/friend_requests", &[])?;
        Ok(body.requests)
    }

    fn send_message(&mut self, receiver_id: UserId, content: &str) -> NetworkResult<Message> {
        let body: MessageBody = self.post(
            "/messages/send",
            json!({ "receiver_id": receiver_id, "content": content }),
        )?;
        Ok(body.data)
    }

    fn message_history(&mut self, friend_id: UserId) -> NetworkResult<Vec<Message>> {
        let body: MessagesBody =
            self.get("/messages/history", &[("friend_id", friend_id.to_string())])?;
        Ok(body.messages)
    }

    fn conversations(&mut self) -> NetworkResult<Vec<ConversationSummary>> {
        let body: ConversationsBody = self.get("/messages/conversations", &[])?;
        Ok(body.conversations)
    }

    fn create_group(&mut self, name: &str) -> NetworkResult<Group> {
        let body: GroupBody = self.post("/groups/create", json!({ "name": name }))?;
        Ok(body.group)
    }

    fn add_group_member(&mut self, group_id: GroupId, user_id: UserId) -> NetworkResult<()> {
        let _: Value = self.post(
            "/groups/add_member",
            json!({ "group_id": group_id, "user_id": user_id }),
        )?;
        Ok(())
    }

    fn remove_group_member(&mut self, group_id: GroupId, user_id: UserId) -> NetworkResult<()> {
        let _: Value = self.post(
            "/groups/remove_member",
            json!({ "group_id": group_id, "user_id": user_id }),
        )?;
        Ok(())
    }

    fn delete_group(&mut self, group_id: GroupId) -> NetworkResult<()> {
        let _: Value = self.post("/groups/delete", json!({ "group_id": group_id }))?;
        Ok(())
    }

    fn send_group_message(&mut self, group_id: GroupId, content: &str) -> NetworkResult<Message> {
        let body: MessageBody = self.post(
            "/groups/send_message",
            json!({ "group_id": group_id, "content": content }),
        )?;
        Ok(body.data)
    }

    fn group_history(&mut self, group_id: GroupId) -> NetworkResult<Vec<Message>> {
        let body: MessagesBody =
            self.get("/groups/history", &[("group_id", group_id.to_string())])?;
        Ok(body.messages)
    }

    fn groups(&mut self) -> NetworkResult<Vec<Group>> {
        let body: GroupsBody = self.get("/groups/list", &[])?;
        Ok(body.groups)
    }

    fn group_members(&mut self, group_id: GroupId) -> NetworkResult<Vec<GroupMember>> {
        let body: MembersBody = self.get(&format!("/groups/{}/members", group_id), &[])?;
        Ok(body.members)
    }

    fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.api_base)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_response_success() {
        let body = json!({"success": true, "friends": []});
        assert_eq!(check_response(200, body.clone(), None).unwrap(), body);
    }

    #[test]
    fn test_check_response_uses_backend_error() {
        let err = check_response(
            400,
            json!({"success": false, "error": "Username already exists"}),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            NetworkError::Http {
                status: 400,
                message: "Username already exists".into()
            }
        );
    }

    #[test]
    fn test_check_response_generic_status_message() {
        let err = check_response(500, json!({}), None).unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn test_check_response_upload_fallback() {
        let err = check_response(413, json!({}), Some("Upload failed")).unwrap_err();
        assert_eq!(err.to_string(), "Upload failed");
    }

    #[test]
    fn test_check_response_flagged_failure_on_ok_status() {
        let err = check_response(200, json!({"success": false, "error": "nope"}), None);
        assert!(err.is_err());
    }

    #[test]
    fn test_urls_join_api_prefix() {
        let config = ClientConfig::new("http://localhost:5000");
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(
            backend.url("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
    }

    #[test]
    fn test_no_cookie_before_login() {
        let backend = HttpBackend::new(&ClientConfig::default()).unwrap();
        assert_eq!(backend.session_cookie(), None);
    }

    #[test]
    fn test_unreachable_server_is_request_error() {
        let mut backend = HttpBackend::new(&ClientConfig::new("http://127.0.0.1:1")).unwrap();
        assert!(matches!(
            backend.current_user(),
            Err(NetworkError::Request(_))
        ));
    }
}
