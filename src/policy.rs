//! Policies for the two soft failure paths of a search.

use std::fmt;
use std::str::FromStr;

use crate::error::FisherError;

/// What to do when no rows survive filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnEmpty {
    /// Fail with [`FisherError::Empty`].
    #[default]
    Raise,
    /// Report an [`EmptyResult`](crate::NoticeKind::EmptyResult) notice and return an empty container.
    Warn,
    /// Return an empty container silently.
    Allow,
}

/// What to do when a candidate path does not match the parse template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnParseError {
    /// Abort the whole call with [`FisherError::Parse`].
    #[default]
    Raise,
    /// Report a [`ParseFailure`](crate::NoticeKind::ParseFailure) notice and skip the candidate.
    Warn,
    /// Skip the candidate silently.
    Ignore,
}

impl OnEmpty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::Warn  => "warn",
            Self::Allow => "allow",
        }
    }
}

impl OnParseError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raise  => "raise",
            Self::Warn   => "warn",
            Self::Ignore => "ignore",
        }
    }
}

impl FromStr for OnEmpty {
    type Err = FisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raise" => Ok(Self::Raise),
            "warn"  => Ok(Self::Warn),
            "allow" => Ok(Self::Allow),
            other => Err(FisherError::UnknownPolicy {
                option:  "on_empty",
                value:   other.to_string(),
                allowed: "'raise', 'warn' or 'allow'",
            }),
        }
    }
}

impl FromStr for OnParseError {
    type Err = FisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raise"  => Ok(Self::Raise),
            "warn"   => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            other => Err(FisherError::UnknownPolicy {
                option:  "on_parse_error",
                value:   other.to_string(),
                allowed: "'raise', 'warn' or 'ignore'",
            }),
        }
    }
}

impl fmt::Display for OnEmpty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OnParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both policies of a single `find_*` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub on_empty:       OnEmpty,
    pub on_parse_error: OnParseError,
}

impl FindOptions {
    /// Build options from policy tokens, e.g. `("warn", "ignore")`.
    pub fn from_tokens(on_empty: &str, on_parse_error: &str) -> Result<Self, FisherError> {
        Ok(Self {
            on_empty:       on_empty.parse()?,
            on_parse_error: on_parse_error.parse()?,
        })
    }
}
