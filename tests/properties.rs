//! Property tests for scaffold.
//!
//! Properties use randomized input generation to protect the merge
//! invariants: idempotence, no deletion, append-only ordering, a printer
//! fixed point, and a parser that never panics.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/merge.rs"]
mod merge;

#[path = "properties/printer.rs"]
mod printer;
