//! RefFlow Core - Backend logic for the RefFlow match tagger
//!
//! This crate contains the tagging state machine, the event/tag/playlist
//! model and the clip export pipeline, with zero UI dependencies.
//! A UI (or the bundled line-oriented front end) drives a [`session::Session`]
//! and renders its state.

pub mod config;
pub mod export;
pub mod logging;
pub mod media;
pub mod models;
pub mod session;
pub mod store;
pub mod timeline;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
