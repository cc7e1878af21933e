use crate::error::FisherError;
use crate::report::Notice;

/// Enumerates candidate paths for a glob.
///
/// Implement this to search anything that can list paths: the local
/// filesystem ([`FsSource`](crate::FsSource)), a fixed list
/// ([`StaticSource`](crate::StaticSource)), a remote bucket listing, a
/// pre-built index.
///
/// # Contract
///
/// `glob` uses `*`, `?` and `[...]` within a single path segment; `*` never
/// crosses `/`. A trailing `/` asks for directories. Return the matching
/// paths in a deterministic order; the finder keeps that order in its
/// results.
///
/// # Example
///
/// ```rust
/// use filefisher::{FisherError, Source};
///
/// struct Nothing;
///
/// impl Source for Nothing {
///     fn enumerate(&self, _glob: &str) -> Result<Vec<String>, FisherError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Source: Send + Sync {
    /// Return every path matching `glob`.
    fn enumerate(&self, glob: &str) -> Result<Vec<String>, FisherError>;
}

/// Receives notices for soft failures and deprecated calls.
///
/// The finder and its containers never print. Whatever would be a warning is
/// turned into a [`Notice`] and handed to a reporter; the default one
/// forwards to `tracing`.
pub trait Reporter: Send + Sync {
    fn report(&self, notice: Notice);
}
