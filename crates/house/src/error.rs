use std::fmt;

use thiserror::Error;

use crate::world::Direction;

pub type HouseResult<T> = Result<T, HouseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    MissingField,
    InvalidValue,
    UnresolvedReference,
    NotFound,
    InvalidOperation,
    InvalidDirection,
    FileNotFound,
    Io,
}

#[derive(Debug, Error)]
pub enum HouseError {
    #[error("Cannot process because the data is malformed: {message}{}", at_suffix(.location))]
    Format {
        message: String,
        location: Option<SourceLocation>,
    },
    #[error("Cannot process because the required field {field} is missing")]
    MissingField { field: String },
    #[error("Cannot process because {field} '{value}' is invalid: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Cannot process because {source_name} refers to '{target}' via {relation}, which does not exist")]
    UnresolvedReference {
        source_name: String,
        target: String,
        relation: String,
    },
    #[error("Cannot perform action because {name} {reason}")]
    NotFound { name: String, reason: String },
    #[error("Cannot perform action because {0}")]
    InvalidOperation(String),
    #[error("Cannot perform action because there is no exit {}", .direction.describe_lowercase())]
    InvalidDirection { direction: Direction },
    #[error("Cannot load '{name}' because the file does not exist")]
    FileNotFound { name: String },
    #[error("Cannot access '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl HouseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format { .. } => ErrorKind::Format,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
            Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Self::InvalidDirection { .. } => ErrorKind::InvalidDirection,
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            location: None,
        }
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(
        source_name: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self::UnresolvedReference {
            source_name: source_name.into(),
            target: target.into(),
            relation: relation.into(),
        }
    }

    pub(crate) fn not_found(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn from_json(error: &serde_json::Error) -> Self {
        let location = (error.line() > 0).then(|| SourceLocation {
            line: error.line(),
            column: error.column(),
        });
        Self::Format {
            message: format!("invalid JSON: {error}"),
            location,
        }
    }

    pub(crate) fn from_json_path(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = error.path().to_string();
        let source = error.into_inner();
        if path.is_empty() || path == "." {
            Self::format(format!("unexpected JSON content: {source}"))
        } else {
            Self::format(format!("unexpected JSON content at {path}: {source}"))
        }
    }
}

fn at_suffix(location: &Option<SourceLocation>) -> String {
    match location {
        Some(location) => format!(" (at {location})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_syntax_errors_carry_line_and_column() {
        let error = serde_json::from_str::<serde_json::Value>("{\n  \"Name\": }")
            .expect_err("malformed");
        let error = HouseError::from_json(&error);
        assert_eq!(error.kind(), ErrorKind::Format);
        match error {
            HouseError::Format {
                location: Some(location),
                ..
            } => assert_eq!(location.line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn messages_use_stable_prefixes() {
        let load = HouseError::missing_field("MoveNumber");
        assert!(load.to_string().starts_with("Cannot process because"));
        assert!(load.to_string().contains("MoveNumber"));

        let runtime = HouseError::InvalidDirection {
            direction: Direction::Up,
        };
        assert_eq!(
            runtime.to_string(),
            "Cannot perform action because there is no exit up"
        );
    }
}
