//! Tokenizer for key-value command lines.
//!
//! Splits one line such as `set "hello world" 1` into the argument vector
//! `["set", "hello world", "1"]`. Supports:
//! - Space-separated tokens (consecutive spaces never yield empty tokens)
//! - Double-quoted and single-quoted strings
//! - Backslash escapes: the next character is taken literally
//!
//! A closing quote must be followed by a space or the end of the line, so
//! `"abc"def` is rejected rather than joined into one token.

use std::fmt;
use thiserror::Error;

/// The two quote characters recognized by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    /// `'`
    Single,
    /// `"`
    Double,
}

impl QuoteKind {
    /// Returns the quote kind for a character, if it is a quote.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            _ => None,
        }
    }

    /// Returns the human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced while tokenizing a command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// A quote was never closed, or was closed with trailing characters.
    ///
    /// `position` is 1-indexed in characters.
    #[error("syntax error: unmatched {quote} quote at: {position}")]
    UnmatchedQuote { quote: QuoteKind, position: usize },
}

/// Scanner state threaded through one forward pass over the input.
#[derive(Debug, Default)]
struct ScanState {
    /// Currently open quote, if any.
    quote: Option<QuoteKind>,
    /// 1-indexed position of the open quote.
    quote_position: usize,
    /// The previous character was a backslash.
    escaped: bool,
    /// Characters of the token being built.
    buffer: String,
}

impl ScanState {
    /// Consumes one character. `next` is the following character, if any.
    fn feed(
        &mut self,
        c: char,
        position: usize,
        next: Option<char>,
        tokens: &mut Vec<String>,
    ) -> Result<(), TokenizeError> {
        if self.escaped {
            self.escaped = false;
            self.buffer.push(c);
            return Ok(());
        }

        if let Some(kind) = QuoteKind::from_char(c) {
            match self.quote {
                None => {
                    self.quote = Some(kind);
                    self.quote_position = position;
                    return Ok(());
                }
                Some(open) if open == kind => {
                    if next.is_some_and(|n| n != ' ') {
                        return Err(TokenizeError::UnmatchedQuote {
                            quote: kind,
                            position,
                        });
                    }
                    self.quote = None;
                    return Ok(());
                }
                // The other quote kind is literal inside an open quote.
                Some(_) => {}
            }
        }

        if c == '\\' {
            self.escaped = true;
            return Ok(());
        }

        if c == ' ' && self.quote.is_none() {
            self.flush(tokens);
            return Ok(());
        }

        self.buffer.push(c);
        Ok(())
    }

    /// Moves a non-empty buffer into the token list.
    fn flush(&mut self, tokens: &mut Vec<String>) {
        if !self.buffer.is_empty() {
            tokens.push(std::mem::take(&mut self.buffer));
        }
    }

    /// Finishes the scan, failing if a quote is still open.
    fn finish(mut self, mut tokens: Vec<String>) -> Result<Vec<String>, TokenizeError> {
        if let Some(quote) = self.quote {
            return Err(TokenizeError::UnmatchedQuote {
                quote,
                position: self.quote_position,
            });
        }
        self.flush(&mut tokens);
        Ok(tokens)
    }
}

/// Tokenizes a key-value command line into its arguments.
///
/// The first token is the command name and the rest are its arguments.
/// An empty or all-space line yields an empty vector.
pub fn tokenize(input: &str) -> Result<Vec<String>, TokenizeError> {
    let mut state = ScanState::default();
    let mut tokens = Vec::new();
    let mut chars = input.chars().enumerate().peekable();

    while let Some((index, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        state.feed(c, index + 1, next, &mut tokens)?;
    }

    state.finish(tokens)
}
