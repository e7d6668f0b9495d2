// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod client;
pub mod content;
pub mod core;
pub mod deck;
pub mod health;
pub mod options;
pub mod repo;
pub mod role;
pub mod server;
pub mod session;
