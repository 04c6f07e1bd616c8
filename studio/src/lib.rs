//! Redraft Studio - actor-based backend for a multi-pane AI writing editor
//!
//! This crate provides the backend server for Redraft: a workspace actor
//! owning per-pane review-cycle state machines, a completion gateway to the
//! model provider, and the REST API consumed by the browser frontend.

pub mod api;
pub mod app_state;
pub mod completion;
pub mod workspace;
