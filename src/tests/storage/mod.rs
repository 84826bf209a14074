//! Flow tests against a real embedded store.
//!
//! Each test opens its own store under a temp directory; nothing is shared
//! between tests.

mod documents_flow;
mod knowledge_flow;
