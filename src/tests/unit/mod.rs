//! Focused unit suites that span more cases than fit comfortably next to
//! the code.

mod validate_rules;
