//! Integration tests for storysave
//!
//! These tests drive a full save to disk and a load back into a fresh
//! runtime through the public API.

#[path = "../common/mod.rs"]
pub mod common;

pub mod resume_flow;
pub mod slot_persistence;
