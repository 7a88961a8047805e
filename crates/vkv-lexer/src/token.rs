use std::fmt;

/// Token classification for KeyValues text.
///
/// Data-carrying variants embed their content directly (no separate `content`
/// field on a token struct), so the parser can match on them exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`, opening a child block.
    BeginChild,

    /// `}`, closing a child block.
    EndChild,

    /// A quoted string; the content excludes the surrounding quote marks.
    /// A backslash that suppressed a terminating quote is retained.
    String(String),

    /// A `//` comment; the content is everything after the two slashes.
    Comment(String),

    /// A sequence the scanner could not tokenize.
    Error(TokenError),

    /// The line iterator is exhausted.
    EndOfInput,
}

/// Diagnostic carried by [`Token::Error`].
///
/// `character` and `offset` identify the offending character within the line
/// when the scanner stopped on one; an unterminated string or a slash at the
/// very end of a line leave both unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenError {
    pub character: Option<char>,
    pub offset: Option<usize>,
    pub line_text: String,
    pub cause: String,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.character, self.offset) {
            (Some(character), Some(offset)) => write!(
                f,
                "{} (character {character:?} at offset {offset} in line {:?})",
                self.cause, self.line_text
            ),
            _ => write!(f, "{} (in line {:?})", self.cause, self.line_text),
        }
    }
}

impl std::error::Error for TokenError {}
