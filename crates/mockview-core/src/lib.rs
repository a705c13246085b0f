//! mockview-core: Heuristic answer scoring and the feedback engine.
//!
//! This crate defines the interview data model, the deterministic
//! five-dimension scoring pipeline, and the traits for the record store and
//! generative-model collaborators that the rest of mockview builds on.

pub mod dimensions;
pub mod engine;
pub mod error;
pub mod model;
pub mod policy;
pub mod prompt;
pub mod questions;
pub mod scoring;
pub mod store;
pub mod text;
pub mod traits;
