//! Byte-span locations inside configuration documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte range in a (possibly named) source document.
///
/// `file` is `None` for documents parsed from memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub start: usize,
    pub end: usize,
}

impl SourceLocation {
    pub fn new(file: Option<String>, start: usize, end: usize) -> Self {
        Self { file, start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}..{}", file, self.start, self.end),
            None => write!(f, "{}..{}", self.start, self.end),
        }
    }
}
