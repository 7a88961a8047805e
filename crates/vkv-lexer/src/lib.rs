//! VKV Lexer
//!
//! Tokenizes Valve KeyValues configuration text into a stream of tokens.
//! Handles quoted strings (a backslash keeps an embedded quote from
//! terminating the string), `{`/`}` block delimiters, `//` line comments,
//! and whitespace separation.
//!
//! The scanner is pull-based and line-buffered: it holds exactly one line of
//! input at a time and asks the caller's line iterator for the next one only
//! once the current line is exhausted.
//!
//! # Example
//!
//! ```
//! use vkv_lexer::{Scanner, Token};
//!
//! let mut scanner = Scanner::new(r#""maps" "de_dust2""#.lines());
//! assert_eq!(scanner.next_token(), Token::String("maps".into()));
//! assert_eq!(scanner.next_token(), Token::String("de_dust2".into()));
//! assert_eq!(scanner.next_token(), Token::EndOfInput);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenError};
