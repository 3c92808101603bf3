//! Craftree Engine - workspace storage and the command-line front end.
//!
//! This crate provides configuration loading, persistence of the recipe and
//! owned-materials workspace, plain-text rendering and command dispatch.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

/// Command parsing and dispatch
pub mod commands;
/// Application configuration
pub mod config;
/// Tracing subscriber setup
pub mod logging;
/// Plain-text output
pub mod render;
/// Workspace document persistence
pub mod store;
