// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for theme preference persistence

mod common;

use common::*;
use murmur_core::*;
use tempfile::TempDir;

#[test]
fn test_theme_toggle_persists() {
    let temp = TempDir::new().unwrap();
    let mut first = client(backend()).with_preferences(PreferenceStore::new(temp.path()));
    assert!(!first.state().dark_theme);

    first.toggle_theme().unwrap();
    assert!(first.state().dark_theme);

    let reloaded = client(backend()).with_preferences(PreferenceStore::new(temp.path()));
    assert!(reloaded.state().dark_theme);
}

#[test]
fn test_theme_survives_logout() {
    let temp = TempDir::new().unwrap();
    let mut client = client(backend()).with_preferences(PreferenceStore::new(temp.path()));
    client.login("linh", PASSWORD).unwrap();
    client.toggle_theme().unwrap();

    client.logout().unwrap();

    assert!(client.state().dark_theme);
}

#[test]
fn test_toggle_without_store_only_changes_state() {
    let mut client = client(backend());

    client.toggle_theme().unwrap();
    client.toggle_theme().unwrap();

    assert!(!client.state().dark_theme);
}

#[test]
fn test_unwritable_store_reports_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let mut client = client(backend()).with_preferences(PreferenceStore::new(&blocker));

    assert!(client.toggle_theme().is_err());
    assert_eq!(
        client.state().toasts.latest().unwrap().kind,
        ToastKind::Error
    );
}
