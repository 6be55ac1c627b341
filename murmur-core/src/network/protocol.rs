// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Channel Packet Framing
//!
//! Text packets of the backend's event channel: Engine.IO v4 transport
//! packets, with Socket.IO v5 packets nested in Engine.IO messages.
//!
//! ```text
//! 0{"sid":...}       open (server)
//! 2 / 3              ping (server) / pong (client)
//! 40                 connect request (client) / 40{"sid":...} ack (server)
//! 41                 disconnect
//! 42["name",{...}]   event
//! 44{"message":...}  connect error
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{NetworkError, NetworkResult};

/// Engine.IO `open` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    #[serde(default)]
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    #[serde(default)]
    pub ping_timeout: u64,
}

/// A decoded channel packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Transport opened.
    Open(OpenHandshake),
    /// Transport closed.
    Close,
    /// Heartbeat from the server.
    Ping,
    /// Heartbeat reply.
    Pong,
    /// No-op.
    Noop,
    /// Namespace connect request, or the server's acknowledgment of it.
    Connect { sid: Option<String> },
    /// Namespace disconnect.
    Disconnect,
    /// Named event with its payload (`Value::Null` when absent).
    Event { name: String, data: Value },
    /// Event acknowledgment; not used by this client.
    Ack,
    /// Namespace connection refused.
    ConnectError(String),
}

/// Encodes a packet into its text frame.
pub fn encode_packet(packet: &Packet) -> NetworkResult<String> {
    let frame = match packet {
        Packet::Open(handshake) => format!("0{}", serde_json::to_string(handshake)?),
        Packet::Close => "1".to_string(),
        Packet::Ping => "2".to_string(),
        Packet::Pong => "3".to_string(),
        Packet::Noop => "6".to_string(),
        Packet::Connect { sid: None } => "40".to_string(),
        Packet::Connect { sid: Some(sid) } => {
            format!("40{}", serde_json::json!({ "sid": sid }))
        }
        Packet::Disconnect => "41".to_string(),
        Packet::Event { name, data } => {
            let args = if data.is_null() {
                Value::Array(vec![Value::String(name.clone())])
            } else {
                Value::Array(vec![Value::String(name.clone()), data.clone()])
            };
            format!("42{}", args)
        }
        Packet::Ack => "43".to_string(),
        Packet::ConnectError(message) => {
            format!("44{}", serde_json::json!({ "message": message }))
        }
    };
    Ok(frame)
}

/// Decodes a text frame into a packet.
pub fn decode_packet(frame: &str) -> NetworkResult<Packet> {
    let mut chars = frame.chars();
    let engine_type = chars
        .next()
        .ok_or_else(|| NetworkError::InvalidPacket("empty frame".into()))?;
    let rest = chars.as_str();

    match engine_type {
        '0' => {
            let handshake: OpenHandshake = serde_json::from_str(rest)
                .map_err(|e| NetworkError::InvalidPacket(format!("open: {}", e)))?;
            Ok(Packet::Open(handshake))
        }
        '1' => Ok(Packet::Close),
        // Probe payloads ("2probe") are only used for transport upgrades.
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '6' => Ok(Packet::Noop),
        '4' => decode_socket_packet(rest),
        other => Err(NetworkError::InvalidPacket(format!(
            "unknown packet type '{}'",
            other
        ))),
    }
}

fn decode_socket_packet(body: &str) -> NetworkResult<Packet> {
    let mut chars = body.chars();
    let socket_type = chars
        .next()
        .ok_or_else(|| NetworkError::InvalidPacket("missing socket packet type".into()))?;
    let payload = strip_namespace(chars.as_str());

    match socket_type {
        '0' => {
            let sid = if payload.is_empty() {
                None
            } else {
                serde_json::from_str::<Value>(payload)
                    .ok()
                    .and_then(|v| v.get("sid").and_then(Value::as_str).map(str::to_string))
            };
            Ok(Packet::Connect { sid })
        }
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(strip_ack_id(payload)),
        '3' => Ok(Packet::Ack),
        '4' => Ok(Packet::ConnectError(decode_error_message(payload))),
        '5' | '6' => Err(NetworkError::InvalidPacket(
            "binary packets are not supported".into(),
        )),
        other => Err(NetworkError::InvalidPacket(format!(
            "unknown socket packet type '{}'",
            other
        ))),
    }
}

fn decode_event(payload: &str) -> NetworkResult<Packet> {
    let args: Vec<Value> = serde_json::from_str(payload)
        .map_err(|e| NetworkError::InvalidPacket(format!("event: {}", e)))?;
    let mut args = args.into_iter();
    let name = match args.next() {
        Some(Value::String(name)) => name,
        _ => return Err(NetworkError::InvalidPacket("event without name".into())),
    };
    let data = args.next().unwrap_or(Value::Null);
    Ok(Packet::Event { name, data })
}

fn decode_error_message(payload: &str) -> String {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::String(message)) => message,
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        Err(_) => payload.to_string(),
    }
}

/// Drops a `/namespace,` prefix. Only the default namespace is used.
fn strip_namespace(payload: &str) -> &str {
    if payload.starts_with('/') {
        match payload.find(',') {
            Some(pos) => &payload[pos + 1..],
            None => "",
        }
    } else {
        payload
    }
}

fn strip_ack_id(payload: &str) -> &str {
    payload.trim_start_matches(|c: char| c.is_ascii_digit())
}
