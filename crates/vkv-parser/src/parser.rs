//! Recursive-descent parser for KeyValues documents.
//!
//! Consumes tokens from `vkv-lexer` one at a time and assembles a [`Node`]
//! tree. Each nesting level runs the same small state machine: an empty
//! pending slot is awaiting a key, an occupied one is awaiting that key's
//! value or child block.
//!
//! The two ways a level can end are kept apart structurally: [`parse_block`]
//! only returns when its closing brace arrives (end of input there means
//! unbalanced braces), and the top-level loop only returns at end of input
//! (a stray closing brace there is an error).
//!
//! [`parse_block`]: Parser::parse_block

use vkv_lexer::{Scanner, Token};

use crate::node::{Node, NodeBuilder};
use crate::{ParseError, ValidationError};

/// Parse a complete document from a sequence of lines.
pub fn parse<I>(lines: I) -> Result<Node, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Parser::new(lines.into_iter()).parse()
}

/// Parse a complete document from a single in-memory string.
pub fn parse_str(source: &str) -> Result<Node, ParseError> {
    parse(source.lines())
}

/// KeyValues document parser.
///
/// Owns its scanner for the duration of one parse; nothing is shared across
/// calls, so independent documents parse independently. The first structural
/// problem aborts the whole parse.
pub struct Parser<I> {
    scanner: Scanner<I>,
}

impl<I> Parser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Create a parser over a sequence of lines (without line terminators).
    pub fn new(lines: I) -> Self {
        Self {
            scanner: Scanner::new(lines),
        }
    }

    /// Parse exactly one document and return its root node.
    ///
    /// The first completed top-level entry becomes the root. Further
    /// top-level entries attach to a block root as children; a leaf root
    /// ignores them.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        let mut root: Option<NodeBuilder> = None;
        let mut current: Option<NodeBuilder> = None;

        loop {
            match self.scanner.next_token() {
                Token::String(text) => match current.take() {
                    None => current = Some(Node::builder().key(text)),
                    Some(entry) => match root.take() {
                        None => root = Some(entry.value(text)),
                        Some(parent) => {
                            let leaf = entry.value(text).build().map_err(|e| self.invalid(e))?;
                            root = Some(parent.add_child(leaf));
                        }
                    },
                },

                Token::BeginChild => match current.take() {
                    None => {
                        return Err(self
                            .malformed("expected a key, but found the start of a child block"))
                    }
                    Some(entry) => {
                        let block = self.parse_block(entry.start_child_block())?;
                        match root.take() {
                            None => root = Some(block),
                            Some(parent) => {
                                let child = block.build().map_err(|e| self.invalid(e))?;
                                root = Some(parent.add_child(child));
                            }
                        }
                    }
                },

                Token::EndChild => {
                    return Err(
                        self.malformed("found the end of a child block, but no block is open")
                    )
                }

                Token::Comment(_) => {}

                Token::EndOfInput => {
                    if current.is_some() {
                        return Err(self.malformed(
                            "unexpected end of input: a key is missing its value or child block",
                        ));
                    }
                    return match root {
                        Some(builder) => builder.build().map_err(|e| self.invalid(e)),
                        None => Err(self.malformed("the document contains no entries")),
                    };
                }

                Token::Error(diagnostic) => return Err(self.malformed(diagnostic.to_string())),
            }
        }
    }

    /// Parse the body of one child block into `block`, consuming tokens up
    /// to and including the closing brace.
    fn parse_block(&mut self, mut block: NodeBuilder) -> Result<NodeBuilder, ParseError> {
        let mut current: Option<NodeBuilder> = None;

        loop {
            match self.scanner.next_token() {
                Token::String(text) => match current.take() {
                    None => current = Some(Node::builder().key(text)),
                    Some(entry) => {
                        let leaf = entry.value(text).build().map_err(|e| self.invalid(e))?;
                        block = block.add_child(leaf);
                    }
                },

                Token::BeginChild => match current.take() {
                    None => {
                        return Err(self
                            .malformed("expected a key, but found the start of a child block"))
                    }
                    Some(entry) => {
                        let child = self.parse_block(entry.start_child_block())?;
                        block = block.add_child(child.build().map_err(|e| self.invalid(e))?);
                    }
                },

                Token::EndChild => {
                    if current.is_some() {
                        return Err(self.malformed(
                            "expected a value or the start of a child block, \
                             but found the end of a block",
                        ));
                    }
                    return Ok(block);
                }

                Token::Comment(_) => {}

                Token::EndOfInput => {
                    return Err(self.malformed(
                        "unexpected end of input: a child block is missing its closing brace",
                    ))
                }

                Token::Error(diagnostic) => return Err(self.malformed(diagnostic.to_string())),
            }
        }
    }

    fn malformed(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: self.scanner.line_number(),
        }
    }

    fn invalid(&self, error: ValidationError) -> ParseError {
        self.malformed(error.to_string())
    }
}
