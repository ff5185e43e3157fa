//! Key-value command handling for SQLSnap.
//!
//! Turns a raw command line into an argument vector and flattens the
//! store's native replies into the shared tabular result.

pub mod reply;
pub mod tokenizer;

pub use reply::{normalize, Reply};
pub use tokenizer::{tokenize, QuoteKind, TokenizeError};
