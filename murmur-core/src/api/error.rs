// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! API Error Types
//!
//! Unified error type for the client API layer.

use thiserror::Error;

use crate::network::NetworkError;
use crate::preferences::PreferencesError;

/// Unified error type for client operations.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Backend call or channel operation failed.
    ///
    /// Displays the backend's message unchanged so it can be shown to the user.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Operation requires a logged-in session.
    #[error("not logged in")]
    NotAuthenticated,

    /// No conversation is open.
    #[error("no active conversation")]
    NoActiveConversation,

    /// Input rejected before reaching the backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Preference file could not be written.
    #[error("preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations.
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_shown_unchanged() {
        let err: ChatError = NetworkError::Http {
            status: 400,
            message: "Username already exists".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Username already exists");
    }
}
