//! Point of instantiation inside the traced C++ source

use std::fmt;

/// File, line and column of the code that triggered an instantiation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl FileLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
