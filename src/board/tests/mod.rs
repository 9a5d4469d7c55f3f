//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Node counts and a naive-generator cross-check
//! - `movegen.rs` - Check evasion, pins, castling and generation modes
//! - `make_unmake.rs` - Apply/undo exactness and mutation primitives
//! - `see.rs` - Exchange evaluation against a full capture minimax
//! - `search.rs` - Search results through the public entry point
//! - `edge_cases.rs` - Promotions, terminal positions and notation
//! - `proptest.rs` - Property-based tests

mod edge_cases;
mod movegen;
