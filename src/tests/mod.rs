//! Cross-module test suites.
//!
//! Unit tests live next to the code they cover in `#[cfg(test)]` modules;
//! this tree holds everything that spans modules: shared fixtures, canned
//! gateway mocks, property tests, parameterized validation grids, and flow
//! tests against a real embedded store.

pub mod common;
pub mod mocks;
mod property;
mod storage;
mod unit;
