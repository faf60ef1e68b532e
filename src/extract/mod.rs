//! Frame extraction from semicolon-delimited sensor captures.

/// Validated numeric matrix type.
pub mod frame;
/// Line classifier and row width policies.
pub mod parser;
