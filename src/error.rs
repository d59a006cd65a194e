//! Error types for resolution and config file parsing

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The resolution target was not an absolute path.
#[derive(Debug, thiserror::Error)]
#[error("input file must be a full path name: {}", path.display())]
pub struct PathError {
    pub path: PathBuf,
}

/// One rejected line of an `.editorconfig` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadLine {
    /// 1-based line number
    pub line: usize,
    pub text: String,
}

impl fmt::Display for BadLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {:2}]: {:?}", self.line, self.text)
    }
}

/// A config file exists but cannot be understood.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{} contains parsing errors:{}", path.display(), format_bad_lines(lines))]
    Syntax { path: PathBuf, lines: Vec<BadLine> },

    #[error("could not load {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },
}

impl ParseError {
    /// Path of the offending config file.
    pub fn path(&self) -> &Path {
        match self {
            ParseError::Syntax { path, .. }
            | ParseError::Toml { path, .. }
            | ParseError::Schema { path, .. }
            | ParseError::Encoding { path } => path,
        }
    }
}

fn format_bad_lines(lines: &[BadLine]) -> String {
    lines.iter().map(|l| format!("\n\t{l}")).collect()
}

/// Anything that can abort a resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_lists_every_line() {
        let err = ParseError::Syntax {
            path: PathBuf::from("/p/.editorconfig"),
            lines: vec![
                BadLine {
                    line: 3,
                    text: "bogus".into(),
                },
                BadLine {
                    line: 12,
                    text: "[unclosed".into(),
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.starts_with("/p/.editorconfig contains parsing errors:"));
        assert!(msg.contains("[line  3]: \"bogus\""));
        assert!(msg.contains("[line 12]: \"[unclosed\""));
    }

    #[test]
    fn test_path_error_message() {
        let err: Error = PathError {
            path: PathBuf::from("relative/file"),
        }
        .into();
        assert!(matches!(err, Error::Path(_)));
        assert!(err.to_string().contains("relative/file"));
    }

    #[test]
    fn test_parse_error_path() {
        let err = ParseError::Encoding {
            path: PathBuf::from("/x/.toolconfig.toml"),
        };
        assert_eq!(err.path(), Path::new("/x/.toolconfig.toml"));
    }
}
