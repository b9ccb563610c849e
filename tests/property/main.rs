//! Property-based soundness tests for container parsing and inflation.
//!
//! Run with: `cargo test --test property`

mod inflate_corruption;
mod parse_truncation;
mod util;
