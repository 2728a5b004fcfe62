//! Blue: a single-user social client core.
//!
//! Domain state (session, feed, settings, follow graph) lives in memory and
//! is mirrored to a key-value store as JSON snapshots under fixed keys.
//! AI-assisted content goes through the [`ai::ContentGateway`] port.

pub mod ai;
pub mod auth;
pub mod config;
pub mod core;
pub mod follow;
pub mod handlers;
pub mod models;
pub mod posts;
pub mod settings;
pub mod static_server;
