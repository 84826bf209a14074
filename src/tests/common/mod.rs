//! Shared test utilities.
//!
//! Store fixtures and record builders used across the test tree. Builders
//! carry realistic Vietnamese content so encoding bugs (byte vs char
//! handling) surface in tests rather than in production.

pub mod fixtures;

pub use fixtures::*;
