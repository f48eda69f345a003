use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripError {
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: directive is never closed")]
    Unclosed { line: usize },

    #[error("target directive must not be empty")]
    EmptyTarget,

    #[error("invalid branch {0:?} (expected IF, ELSE or BOTH)")]
    InvalidBranch(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StripError {
    /// Line the error points at, when it comes from parsing.
    pub fn line(&self) -> Option<usize> {
        match self {
            StripError::Malformed { line, .. } | StripError::Unclosed { line } => Some(*line),
            _ => None,
        }
    }

    /// Render as `source:line: reason`, or `source: message` when there is
    /// no line to point at.
    pub fn located(&self, source: &str) -> String {
        match self {
            StripError::Malformed { line, reason } => format!("{}:{}: {}", source, line, reason),
            StripError::Unclosed { line } => format!("{}:{}: directive is never closed", source, line),
            other => format!("{}: {}", source, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = StripError::Malformed {
            line: 3,
            reason: "#endif without matching #if".to_string(),
        };
        assert_eq!(err.to_string(), "line 3: #endif without matching #if");
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_located_puts_line_after_source() {
        let err = StripError::Malformed {
            line: 7,
            reason: "#else without matching #if".to_string(),
        };
        assert_eq!(err.located("src/a.c"), "src/a.c:7: #else without matching #if");
        assert_eq!(
            StripError::Unclosed { line: 2 }.located("<stdin>"),
            "<stdin>:2: directive is never closed"
        );
        assert_eq!(
            StripError::EmptyTarget.located("b.h"),
            "b.h: target directive must not be empty"
        );
    }

    #[test]
    fn test_invalid_branch_has_no_line() {
        let err = StripError::InvalidBranch("MAYBE".to_string());
        assert_eq!(err.line(), None);
        assert!(err.to_string().contains("MAYBE"));
    }
}
