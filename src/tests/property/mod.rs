//! Property-based tests for the support console core.
//!
//! These use the proptest framework to check invariants over generated
//! input rather than hand-picked cases.
//!
//! ## Running Property Tests
//!
//! Run all property tests:
//! ```sh
//! cargo test property --release
//! ```
//!
//! Run a specific property test module:
//! ```sh
//! cargo test property::retrieval_props --release
//! ```
//!
//! ## Test Modules
//!
//! - `retrieval_props`: knowledge entry matching
//!   - A stored keyword embedded anywhere in the query matches its entry
//!   - A query contained in an entry's question matches with no keywords
//!   - Matching is case-insensitive in both directions
//!   - The first matching entry wins, regardless of later matches
//!   - Disjoint alphabets never match
//!
//! - `context_props`: AI context assembly
//!   - The context is never an empty string, even with no documents
//!   - Every document title and body appears verbatim
//!   - Documents keep their list order
//!
//! - `merge_props`: stored-settings merge
//!   - An empty stored record yields the defaults unchanged
//!   - A stored field always wins over its default
//!   - A null field falls back to its default
//!   - The merged record never loses a field

mod context_props;
mod merge_props;
mod retrieval_props;
