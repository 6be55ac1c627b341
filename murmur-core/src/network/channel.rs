// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Push Channel Trait
//!
//! Persistent connection used for server-to-client event delivery,
//! independent of the request/response transport. Every event kind has its
//! own typed payload in place of string-keyed callbacks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{NetworkError, NetworkResult};
use super::protocol::Packet;
use crate::models::{ChatKind, GroupId, Message, UserId};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to the server.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Connected and ready.
    Connected,
}

/// Configuration for a push channel connection.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// WebSocket URL of the channel endpoint.
    pub url: String,
    /// Session cookie to present during the handshake.
    pub cookie: Option<String>,
    /// Handshake timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read timeout used when polling, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            url: String::new(),
            cookie: None,
            connect_timeout_ms: 10_000,
            poll_interval_ms: 50,
        }
    }
}

/// Conversation room reference carried by join and leave events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub id: i64,
}

/// Payload of an outgoing chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub id: i64,
    pub content: String,
}

/// Events emitted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Start receiving messages for a conversation.
    JoinChat(RoomRef),
    /// Stop receiving messages for a conversation.
    LeaveChat(RoomRef),
    /// Deliver a message to a conversation.
    SendMessage(OutgoingMessage),
}

impl ClientEvent {
    /// Returns the wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinChat(_) => "join_chat",
            ClientEvent::LeaveChat(_) => "leave_chat",
            ClientEvent::SendMessage(_) => "send_message",
        }
    }

    /// Converts the event into a channel packet.
    pub fn to_packet(&self) -> NetworkResult<Packet> {
        let data = match self {
            ClientEvent::JoinChat(room) | ClientEvent::LeaveChat(room) => {
                serde_json::to_value(room)?
            }
            ClientEvent::SendMessage(message) => serde_json::to_value(message)?,
        };
        Ok(Packet::Event {
            name: self.name().to_string(),
            data,
        })
    }
}

/// Payload of a `new_message` push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(rename = "type")]
    pub kind: ChatKind,
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
    pub timestamp: String,
}

impl IncomingMessage {
    /// Converts the push payload into a transcript record.
    pub fn into_message(self) -> Message {
        Message {
            id: self.id,
            sender_id: self.sender_id,
            sender_username: self.sender_username,
            receiver_id: self.receiver_id,
            group_id: self.group_id,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

/// Payload of a `message_notification` push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageNotification {
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub from_user: String,
    pub content: String,
    /// Present for group notifications only.
    #[serde(default)]
    pub group_name: Option<String>,
}

impl MessageNotification {
    /// Returns the toast text for this notification.
    pub fn summary(&self) -> String {
        match (self.kind, &self.group_name) {
            (ChatKind::Group, Some(group)) => format!(
                "New message in {} from {}: {}",
                group, self.from_user, self.content
            ),
            _ => format!("New message from {}: {}", self.from_user, self.content),
        }
    }
}

/// Events pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Channel connected.
    Connected,
    /// Channel lost its connection.
    Disconnected,
    /// Server refused or failed the connection.
    ConnectError(String),
    /// A message was posted to a conversation the client joined.
    NewMessage(IncomingMessage),
    /// A message arrived for the user somewhere.
    MessageNotification(MessageNotification),
}

impl PushEvent {
    /// Decodes a named server event.
    ///
    /// Returns `Ok(None)` for event names the client does not consume.
    pub fn from_event(name: &str, data: Value) -> NetworkResult<Option<Self>> {
        let event = match name {
            "new_message" => PushEvent::NewMessage(
                serde_json::from_value(data)
                    .map_err(|e| NetworkError::InvalidPacket(format!("new_message: {}", e)))?,
            ),
            "message_notification" => PushEvent::MessageNotification(
                serde_json::from_value(data).map_err(|e| {
                    NetworkError::InvalidPacket(format!("message_notification: {}", e))
                })?,
            ),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// Push channel trait.
///
/// Abstracts the persistent event connection so the controller can be
/// driven by a WebSocket in production and by a mock in tests.
///
/// # Polling
///
/// `poll` never blocks longer than the configured poll interval, which
/// keeps a single-threaded front end loop responsive.
pub trait PushChannel {
    /// Connects to the server.
    fn connect(&mut self, config: &ChannelConfig) -> NetworkResult<()>;

    /// Disconnects from the server.
    ///
    /// Safe to call even if not connected.
    fn disconnect(&mut self) -> NetworkResult<()>;

    /// Returns the current connection state.
    fn state(&self) -> ConnectionState;

    /// Returns true if connected and ready.
    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Emits an event to the server.
    ///
    /// Returns an error if not connected.
    fn emit(&mut self, event: &ClientEvent) -> NetworkResult<()>;

    /// Returns the next pushed event, or `Ok(None)` if none is available.
    fn poll(&mut self) -> NetworkResult<Option<PushEvent>>;
}
