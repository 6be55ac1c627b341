// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Error Types

use thiserror::Error;

/// Errors raised by the REST backend and the push channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The backend answered with a non-success status.
    ///
    /// Displays only the message so it can be shown to the user as-is.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Backend-supplied error text, or a generic status message.
        message: String,
    },

    /// The request could not be performed.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body was not the expected JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Connection to the push channel failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Operation needs a connected channel.
    #[error("not connected")]
    NotConnected,

    /// Connection was closed by the server.
    #[error("connection closed")]
    ConnectionClosed,

    /// Writing to the channel failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Reading from the channel failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// A channel packet could not be parsed.
    #[error("invalid packet: {0}")]
    InvalidPacket(String),
}

impl NetworkError {
    /// Builds the error for a non-success HTTP status without a backend message.
    pub fn status(status: u16) -> Self {
        NetworkError::Http {
            status,
            message: format!("HTTP error! status: {}", status),
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        NetworkError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::InvalidResponse(err.to_string())
    }
}

/// Result type for network operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
