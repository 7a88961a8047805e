//! VKV Parser
//!
//! Builds a validated KeyValues tree from tokenized configuration text and
//! serializes it back to canonical indented form. A node binds a key to
//! either a string value or an ordered block of child nodes, never both;
//! the invariant is enforced when a node is built, so an invalid node can
//! never reach a caller.
//!
//! Parsing consumes the token stream in one pass and aborts on the first
//! structural problem with the line number where it was detected. There is
//! no recovery and no partial tree.

pub mod node;
pub mod parser;

pub use node::{Node, NodeBuilder};
pub use parser::{parse, parse_str, Parser};

/// Parse error with the 1-based line number active when it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed document at line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// Rejection of a node whose fields violate the construction invariant:
/// a non-empty key bound to exactly one of value or children.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node: {message}")]
pub struct ValidationError {
    pub message: String,
}
