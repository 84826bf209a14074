//! Client for the remote AI gateway.
//!
//! The gateway fronts the LLM with two endpoints, chat completion and
//! translation. This module owns the HTTP client, the error taxonomy with
//! its canned user-facing messages, and the batch translation helper used
//! by the page editors.

pub mod client;
pub mod error;
pub mod translate;

pub use client::{Gateway, GatewayClient};
pub use error::{GatewayError, GatewayResult};
pub use translate::{strip_code_fences, translate_fields};
