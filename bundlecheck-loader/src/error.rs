use camino::Utf8PathBuf;
use thiserror::Error;

/// Failure to load a single configuration file. Recorded per file; never aborts the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("malformed config{}: {message}", position(.line, .column, .offset))]
    Malformed {
        line: Option<u64>,
        column: Option<u64>,
        /// Byte offset of the parse error.
        offset: Option<u64>,
        message: String,
    },

    #[error("bundle name `{name}` is already used by {first}")]
    DuplicateName { name: String, first: Utf8PathBuf },
}

impl ConfigLoadError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        ConfigLoadError::Malformed {
            line: None,
            column: None,
            offset: None,
            message: message.into(),
        }
    }

    pub(crate) fn from_yaml(err: &serde_yaml::Error) -> Self {
        let loc = err.location();
        ConfigLoadError::Malformed {
            line: loc.as_ref().map(|l| l.line() as u64),
            column: loc.as_ref().map(|l| l.column() as u64),
            offset: loc.as_ref().map(|l| l.index() as u64),
            message: err.to_string(),
        }
    }

    pub fn line(&self) -> Option<u64> {
        match self {
            ConfigLoadError::Malformed { line, .. } => *line,
            _ => None,
        }
    }

    pub fn column(&self) -> Option<u64> {
        match self {
            ConfigLoadError::Malformed { column, .. } => *column,
            _ => None,
        }
    }
}

fn position(line: &Option<u64>, column: &Option<u64>, offset: &Option<u64>) -> String {
    match (line, column, offset) {
        (Some(l), Some(c), Some(o)) => format!(" at line {l}, column {c} (offset {o})"),
        (Some(l), Some(c), None) => format!(" at line {l}, column {c}"),
        (Some(l), None, _) => format!(" at line {l}"),
        _ => String::new(),
    }
}

/// Failure that ends the load phase for the whole run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("artifact definition `{name}` is declared in both {first} and {second}")]
    DuplicateDefinition {
        name: String,
        first: Utf8PathBuf,
        second: Utf8PathBuf,
    },

    #[error("load phase exceeded its budget of {limit_ms} ms")]
    Timeout { limit_ms: u64 },

    #[error("invalid layout pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}
