//! Parser for the text record format
//!
//! ```text
//! entity 1 "fib<10>"
//! instantiation 0 1 TemplateInstantiation "main.cpp" 3 12
//! instantiation 1 2 Memoization -
//! result "int_<55>"
//! ```
//!
//! One record per line; blank lines and `#` comments are ignored. The parser
//! only checks framing. Whether the ids make sense is the builder's job.

use super::errors::TraceFormatError;
use super::lexer::{Lexer, Token};
use super::record::{TracePosition, TraceRecord};
use crate::metaprogram::kind::InstantiationKind;
use crate::metaprogram::location::FileLocation;

pub struct RecordParser {
    tokens: Vec<Token>,
    position: usize,
}

impl RecordParser {
    pub fn new(source: &str) -> Result<Self, TraceFormatError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse every record, paired with the position of its keyword
    pub fn parse_records(&mut self) -> Result<Vec<(TraceRecord, TracePosition)>, TraceFormatError> {
        let mut records = Vec::new();

        loop {
            match self.advance() {
                Token::Eof(_) => break,
                Token::Newline(_) => continue,
                Token::Word(keyword, pos) => {
                    let record = match keyword.as_str() {
                        "entity" => self.parse_entity()?,
                        "instantiation" => self.parse_instantiation()?,
                        "result" => TraceRecord::Result(self.expect_string("evaluation result")?),
                        _ => {
                            return Err(TraceFormatError::syntax(
                                format!("unknown record '{}'", keyword),
                                pos,
                            ));
                        }
                    };
                    self.expect_end_of_record()?;
                    records.push((record, pos));
                }
                other => {
                    return Err(TraceFormatError::syntax(
                        format!("expected a record keyword, found {}", other),
                        other.position(),
                    ));
                }
            }
        }

        Ok(records)
    }

    fn parse_entity(&mut self) -> Result<TraceRecord, TraceFormatError> {
        let id = self.expect_integer("entity id")?;
        let name = self.expect_string("entity name")?;
        Ok(TraceRecord::Entity { id, name })
    }

    fn parse_instantiation(&mut self) -> Result<TraceRecord, TraceFormatError> {
        let source = self.expect_integer("source entity id")?;
        let target = self.expect_integer("target entity id")?;
        let kind = self.expect_kind()?;

        let point_of_instantiation = match self.advance() {
            Token::Dash(_) => None,
            Token::Str(file, _) => {
                let line = self.expect_integer("line")?;
                let column = self.expect_integer("column")?;
                Some(FileLocation::new(file, line as usize, column as usize))
            }
            other => {
                return Err(TraceFormatError::syntax(
                    format!("expected a file name or '-', found {}", other),
                    other.position(),
                ));
            }
        };

        Ok(TraceRecord::Instantiation {
            source,
            target,
            kind,
            point_of_instantiation,
        })
    }

    fn expect_kind(&mut self) -> Result<InstantiationKind, TraceFormatError> {
        match self.advance() {
            Token::Word(name, position) => name
                .parse::<InstantiationKind>()
                .map_err(|_| TraceFormatError::UnknownKind { name, position }),
            other => Err(TraceFormatError::syntax(
                format!("expected an instantiation kind, found {}", other),
                other.position(),
            )),
        }
    }

    fn expect_integer(&mut self, what: &str) -> Result<u64, TraceFormatError> {
        match self.advance() {
            Token::Integer(value, _) => Ok(value),
            other => Err(TraceFormatError::syntax(
                format!("expected {}, found {}", what, other),
                other.position(),
            )),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, TraceFormatError> {
        match self.advance() {
            Token::Str(value, _) => Ok(value),
            other => Err(TraceFormatError::syntax(
                format!("expected {} as a quoted string, found {}", what, other),
                other.position(),
            )),
        }
    }

    fn expect_end_of_record(&mut self) -> Result<(), TraceFormatError> {
        match self.peek().clone() {
            Token::Newline(_) => {
                self.advance();
                Ok(())
            }
            Token::Eof(_) => Ok(()),
            other => Err(TraceFormatError::syntax(
                format!("unexpected {} after record", other),
                other.position(),
            )),
        }
    }

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }
}
