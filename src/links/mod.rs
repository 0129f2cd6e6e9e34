//! Link detection and substitution.

/// Link categories and the pattern table.
pub mod patterns;
/// Single-pass substitution engine.
pub mod replacer;
/// Static suffix and host tables.
pub mod tables;

pub use patterns::{LinkCategory, LinkMatch, PatternError, PatternTable};
pub use replacer::{LinkReplacer, Substitution};
