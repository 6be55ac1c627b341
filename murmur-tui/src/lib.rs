// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Murmur Terminal UI

pub mod app;
pub mod config;
pub mod handlers;
pub mod ui;
