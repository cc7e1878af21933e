use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`FisherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid patterns, reserved names, bad test paths, bad globs.
    Config,
    /// A placeholder had no value while rendering.
    MissingField,
    /// A candidate did not match the parse template.
    Parse,
    /// Two rows carry identical metadata.
    Uniqueness,
    /// No rows survived filtering.
    EmptyResult,
    /// A single-result query did not yield exactly one row.
    Cardinality,
    /// Unknown policy token or a removed option.
    Policy,
    /// Failure inside a candidate source.
    Io,
}

#[derive(Error, Debug)]
pub enum FisherError {
    // Config
    #[error("'{name}' is not a valid placeholder (pattern '{pattern}')")]
    ReservedPlaceholder { name: String, pattern: String },

    #[error("Only named fields are currently allowed, got '{{{name}}}' in pattern '{pattern}'")]
    UnnamedPlaceholder { name: String, pattern: String },

    #[error("invalid placeholder name '{name}' in pattern '{pattern}'")]
    InvalidPlaceholder { name: String, pattern: String },

    #[error("unmatched brace at byte {position} in pattern '{pattern}'")]
    UnbalancedBrace { pattern: String, position: usize },

    #[error("file_pattern cannot contain path separator ('/'), got '{0}'")]
    FileSeparator(String),

    #[error("`test_paths` are not unique: '{0}' appears more than once")]
    DuplicateTestPath(String),

    #[error("invalid glob '{glob}': {reason}")]
    InvalidGlob { glob: String, reason: String },

    #[error("unknown field '{field}', available: {available}")]
    UnknownField { field: String, available: String },

    #[error("row '{path}' has {got} values, expected {expected}")]
    RowWidth { path: String, got: usize, expected: usize },

    // Render
    #[error("no value supplied for '{field}' in pattern '{pattern}'")]
    MissingField { field: String, pattern: String },

    // Search
    #[error("Could not parse '{path}' with the pattern '{pattern}'")]
    Parse { path: String, pattern: String },

    #[error("Non-unique metadata detected: {0}")]
    NonUnique(String),

    #[error("Found no files matching criteria (glob '{0}')")]
    Empty(String),

    #[error("Found more than one ({0}) files/ paths")]
    MoreThanOne(usize),

    #[error("Found no files matching criteria ({0}), expected exactly one but found 0")]
    NoneFound(String),

    // Policy
    #[error("Unknown value for '{option}': '{value}'. Must be one of {allowed}.")]
    UnknownPolicy {
        option: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("`{option}` has been deprecated in favour of `{replacement}`")]
    Deprecated {
        option: &'static str,
        replacement: &'static str,
    },

    // Sources
    #[error("IO error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source error: {0}")]
    Source(String),
}

impl FisherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ReservedPlaceholder { .. }
            | Self::UnnamedPlaceholder { .. }
            | Self::InvalidPlaceholder { .. }
            | Self::UnbalancedBrace { .. }
            | Self::FileSeparator(_)
            | Self::DuplicateTestPath(_)
            | Self::InvalidGlob { .. }
            | Self::UnknownField { .. }
            | Self::RowWidth { .. } => ErrorKind::Config,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::NonUnique(_) => ErrorKind::Uniqueness,
            Self::Empty(_) => ErrorKind::EmptyResult,
            Self::MoreThanOne(_) | Self::NoneFound(_) => ErrorKind::Cardinality,
            Self::UnknownPolicy { .. } | Self::Deprecated { .. } => ErrorKind::Policy,
            Self::Io { .. } | Self::Source(_) => ErrorKind::Io,
        }
    }

    /// Whether a `warn`/`ignore`/`allow` policy could have softened this error.
    ///
    /// Only parse failures and empty results have a soft path; everything else
    /// always aborts the call.
    pub fn is_policy_controlled(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Empty(_))
    }
}
