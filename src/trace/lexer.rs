//! Lexer for the text record format
//!
//! Records are line oriented, so newlines are significant and come out as
//! [`Token::Newline`]. Everything from `#` to the end of the line is a comment.

use super::errors::TraceFormatError;
use super::record::TracePosition;
use std::fmt;

/// Tokens of the text record format.
///
/// Every variant carries its [`TracePosition`] so parse errors can point at
/// the offending token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Record keyword or kind name
    Word(String, TracePosition),
    Integer(u64, TracePosition),
    Str(String, TracePosition),
    /// `-`, an absent point of instantiation
    Dash(TracePosition),
    Newline(TracePosition),
    Eof(TracePosition),
}

impl Token {
    pub fn position(&self) -> TracePosition {
        match self {
            Token::Word(_, pos)
            | Token::Integer(_, pos)
            | Token::Str(_, pos)
            | Token::Dash(pos)
            | Token::Newline(pos)
            | Token::Eof(pos) => *pos,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w, _) => write!(f, "'{}'", w),
            Token::Integer(n, _) => write!(f, "integer {}", n),
            Token::Str(s, _) => write!(f, "string \"{}\"", s),
            Token::Dash(_) => write!(f, "'-'"),
            Token::Newline(_) => write!(f, "end of line"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always [`Token::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, TraceFormatError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_blanks_and_comments();

            let pos = self.current_position();
            let Some(ch) = self.advance() else {
                tokens.push(Token::Eof(pos));
                break;
            };

            let token = match ch {
                '\n' => Token::Newline(pos),
                '"' => self.string(pos)?,
                '-' => Token::Dash(pos),
                '0'..='9' => self.integer(ch, pos)?,
                'a'..='z' | 'A'..='Z' | '_' => self.word(ch, pos),
                other => {
                    return Err(TraceFormatError::syntax(
                        format!("unexpected character '{}'", other),
                        pos,
                    ));
                }
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn string(&mut self, start: TracePosition) -> Result<Token, TraceFormatError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            match ch {
                '"' => return Ok(Token::Str(string, start)),
                '\n' => break,
                '\\' => {
                    let escape_pos = self.current_position();
                    let escaped = self.advance().ok_or_else(|| {
                        TraceFormatError::syntax("unterminated string", start)
                    })?;
                    string.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '\\' => '\\',
                        '"' => '"',
                        other => {
                            return Err(TraceFormatError::syntax(
                                format!("unknown escape sequence \\{}", other),
                                escape_pos,
                            ));
                        }
                    });
                }
                other => string.push(other),
            }
        }

        Err(TraceFormatError::syntax("unterminated string", start))
    }

    fn integer(&mut self, first: char, start: TracePosition) -> Result<Token, TraceFormatError> {
        let mut digits = String::new();
        digits.push(first);
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.advance();
        }

        if self.peek().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_') {
            return Err(TraceFormatError::syntax(
                format!("malformed number starting with '{}'", digits),
                start,
            ));
        }

        digits
            .parse::<u64>()
            .map(|value| Token::Integer(value, start))
            .map_err(|_| TraceFormatError::syntax(format!("integer {} is too large", digits), start))
    }

    fn word(&mut self, first: char, start: TracePosition) -> Token {
        let mut word = String::new();
        word.push(first);
        while let Some(ch) = self.peek() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            word.push(ch);
            self.advance();
        }
        Token::Word(word, start)
    }

    /// Skip spaces, tabs, carriage returns and comments, stopping at newlines
    fn skip_blanks_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_position(&self) -> TracePosition {
        TracePosition::new(self.line, self.column)
    }
}
