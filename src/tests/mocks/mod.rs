//! Canned gateway mocks.
//!
//! [`MockGateway`] is generated by mockall on the [`Gateway`] trait; tests
//! that need fine-grained expectations build their own. These helpers cover
//! the two common setups so a flow test reads as one line.

#![allow(dead_code)]

use std::sync::Arc;

use crate::core::gateway::client::MockGateway;
use crate::core::gateway::{Gateway, GatewayError};

/// Gateway that answers every chat call with the same reply.
pub fn gateway_replying(reply: &str) -> Arc<dyn Gateway> {
    let reply = reply.to_string();
    let mut gateway = MockGateway::new();
    gateway
        .expect_chat()
        .returning(move |_, _| Ok(reply.clone()));
    Arc::new(gateway)
}

/// Gateway whose chat endpoint fails with the given HTTP status, classified
/// the same way a live response would be.
pub fn gateway_failing(status: u16) -> Arc<dyn Gateway> {
    let mut gateway = MockGateway::new();
    gateway.expect_chat().returning(move |_, _| {
        Err(GatewayError::from_response(
            status,
            r#"{"error":"gateway down"}"#,
        ))
    });
    Arc::new(gateway)
}
