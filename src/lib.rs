//! Conversation data-access layer, HTTP API and setup tooling - Library exports for testing

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod setup;
