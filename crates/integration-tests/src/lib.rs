//! critica/crates/integration-tests/src/lib.rs
//!
//! Intentionally empty: this crate exists for its `tests/` targets, which
//! drive the assembled application end to end over an in-memory store.
