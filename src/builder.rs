use crate::criteria::{Criteria, IntoValues};
use crate::error::FisherError;
use crate::finder::FileFinder;
use crate::policy::{FindOptions, OnEmpty, OnParseError};
use crate::results::FileContainer;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A chained search against a [`FileFinder`].
///
/// Created via [`FileFinder::query()`]. Constraints given with
/// [`with`](Query::with) take precedence over a mapping passed to
/// [`criteria`](Query::criteria), whatever order they are set in.
///
/// # Example
///
/// ```rust
/// use filefisher::{FileFinder, OnEmpty};
///
/// let finder = FileFinder::new("{a}/{b}", "file")?
///     .with_test_paths(["a1/foo/file", "a2/foo/file", "a2/bar/file"])?;
///
/// let found = finder
///     .query()
///     .with("b", "foo")
///     .on_empty(OnEmpty::Allow)
///     .paths()?;
///
/// assert_eq!(found.paths().collect::<Vec<_>>(), ["a1/foo/*", "a2/foo/*"]);
/// # Ok::<(), filefisher::FisherError>(())
/// ```
pub struct Query<'f> {
    finder:      &'f FileFinder,
    criteria:    Criteria,
    keywords:    Criteria,
    options:     FindOptions,
    allow_empty: Option<bool>,
}

impl<'f> Query<'f> {
    pub(crate) fn new(finder: &'f FileFinder) -> Self {
        Self {
            finder,
            criteria:    Criteria::new(),
            keywords:    Criteria::new(),
            options:     FindOptions::default(),
            allow_empty: None,
        }
    }

    // ── Criteria ──────────────────────────────────────────────────────────

    /// Set the base constraint mapping.
    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Constrain one field. Several values are alternatives.
    pub fn with(mut self, field: impl Into<String>, values: impl IntoValues) -> Self {
        self.keywords.insert(field, values);
        self
    }

    // ── Policies ──────────────────────────────────────────────────────────

    pub fn on_empty(mut self, policy: OnEmpty) -> Self {
        self.options.on_empty = policy;
        self
    }

    pub fn on_parse_error(mut self, policy: OnParseError) -> Self {
        self.options.on_parse_error = policy;
        self
    }

    pub fn options(mut self, options: FindOptions) -> Self {
        self.options = options;
        self
    }

    /// Removed. Any call makes the query fail; use [`on_empty`](Self::on_empty).
    #[deprecated(note = "use `on_empty` instead")]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = Some(allow);
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// See [`FileFinder::find_paths`].
    pub fn paths(self) -> Result<FileContainer, FisherError> {
        let criteria = self.resolve()?;
        self.finder.find_paths(&criteria, self.options)
    }

    /// See [`FileFinder::find_files`].
    pub fn files(self) -> Result<FileContainer, FisherError> {
        let criteria = self.resolve()?;
        self.finder.find_files(&criteria, self.options)
    }

    /// See [`FileFinder::find_single_path`].
    pub fn single_path(self) -> Result<FileContainer, FisherError> {
        let criteria = self.resolve()?;
        self.finder.find_single_path(&criteria, self.options)
    }

    /// See [`FileFinder::find_single_file`].
    pub fn single_file(self) -> Result<FileContainer, FisherError> {
        let criteria = self.resolve()?;
        self.finder.find_single_file(&criteria, self.options)
    }

    fn resolve(&self) -> Result<Criteria, FisherError> {
        if self.allow_empty.is_some() {
            return Err(FisherError::Deprecated {
                option:      "_allow_empty",
                replacement: "on_empty",
            });
        }
        Ok(Criteria::merge(&self.criteria, &self.keywords))
    }
}
