// ABOUTME: Error types for reading and parsing .ckl checklist files

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Cannot read checklist {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} line {line}: indented line does not follow an item at the enclosing level")]
    UnexpectedIndent { path: PathBuf, line: usize },

    #[error("{path} line {line}: 'from:' needs a list name")]
    EmptyParent { path: PathBuf, line: usize },

    #[error("Inheritance cycle: {0} is already being loaded")]
    InheritanceCycle(PathBuf),
}
