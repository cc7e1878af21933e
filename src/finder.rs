//! [`FileFinder`]: a path pattern plus a file pattern, and the search pipeline
//! that turns enumerated candidates into a [`FileContainer`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use globset::GlobMatcher;

use crate::builder::Query;
use crate::criteria::{Criteria, Fields};
use crate::engine::{compile_glob, FsSource, StaticSource};
use crate::entry::Row;
use crate::error::FisherError;
use crate::pattern::{has_wildcard, value_glob, Pattern};
use crate::policy::{FindOptions, OnEmpty, OnParseError};
use crate::report::{Notice, NoticeKind, TracingReporter};
use crate::results::{assert_unique, FileContainer};
use crate::traits::{Reporter, Source};

/// Which part of the full pattern a search resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    /// Directories matching the path pattern.
    Paths,
    /// Files matching path + file pattern.
    Files,
}

/// Finds files whose names follow a placeholder pattern.
///
/// A non-empty path pattern always ends with `/`; the file pattern is a
/// single path component. Fields shared by both must agree: they are parsed as one
/// concatenated pattern.
///
/// ```rust
/// use filefisher::{Criteria, FileFinder};
///
/// let finder = FileFinder::new("{model}/{scen}", "{var}_{model}.nc")?
///     .with_test_paths(["mpi/ssp585/tas_mpi.nc", "cesm/ssp126/pr_cesm.nc"])?;
///
/// let found = finder.find_files(&Criteria::new().with("scen", "ssp585"), Default::default())?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(found.get(0).unwrap().get("var"), Some("tas"));
/// # Ok::<(), filefisher::FisherError>(())
/// ```
#[derive(Clone)]
pub struct FileFinder {
    path:       Pattern,
    file:       Pattern,
    full:       Pattern,
    source:     Arc<dyn Source>,
    test_paths: Option<Vec<String>>,
    reporter:   Arc<dyn Reporter>,
}

impl FileFinder {
    /// Compile both patterns. Searches go to the local filesystem until
    /// [`with_test_paths`](Self::with_test_paths) or
    /// [`with_source`](Self::with_source) says otherwise.
    pub fn new(path_pattern: &str, file_pattern: &str) -> Result<Self, FisherError> {
        if file_pattern.contains('/') {
            return Err(FisherError::FileSeparator(file_pattern.to_string()));
        }

        let path_pattern = if path_pattern.is_empty() || path_pattern.ends_with('/') {
            path_pattern.to_string()
        } else {
            format!("{path_pattern}/")
        };

        let path = Pattern::compile(&path_pattern)?;
        let file = Pattern::compile(file_pattern)?;
        let full = Pattern::compile(&format!("{path_pattern}{file_pattern}"))?;

        Ok(Self {
            path,
            file,
            full,
            source:     Arc::new(FsSource::default()),
            test_paths: None,
            reporter:   Arc::new(TracingReporter),
        })
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Search `paths` instead of the filesystem.
    ///
    /// Paths must be unique, both verbatim and after normalizing separators
    /// (`a//b/` and `a/b` are the same path).
    pub fn with_test_paths<I, S>(mut self, paths: I) -> Result<Self, FisherError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();

        let mut raw = HashSet::new();
        let mut normalized = HashSet::new();
        for p in &paths {
            if !raw.insert(p.as_str()) || !normalized.insert(normalize(p)) {
                return Err(FisherError::DuplicateTestPath(p.clone()));
            }
        }

        self.source = Arc::new(StaticSource::new(paths.clone()));
        self.test_paths = Some(paths);
        Ok(self)
    }

    /// Enumerate candidates with a custom [`Source`]. No checks are applied to
    /// what it returns.
    pub fn with_source(mut self, source: impl Source + 'static) -> Self {
        self.source = Arc::new(source);
        self.test_paths = None;
        self
    }

    /// Deliver warnings to `reporter` instead of `tracing`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    // ── Patterns and keys ─────────────────────────────────────────────────

    pub fn path_pattern(&self) -> &str {
        self.path.as_str()
    }

    pub fn file_pattern(&self) -> &str {
        self.file.as_str()
    }

    pub fn full_pattern(&self) -> &str {
        self.full.as_str()
    }

    pub fn path(&self) -> &Pattern {
        &self.path
    }

    pub fn file(&self) -> &Pattern {
        &self.file
    }

    pub fn full(&self) -> &Pattern {
        &self.full
    }

    /// Path fields followed by file fields not already present.
    pub fn keys(&self) -> &[String] {
        self.full.keys()
    }

    pub fn keys_path(&self) -> &[String] {
        self.path.keys()
    }

    pub fn keys_file(&self) -> &[String] {
        self.file.keys()
    }

    /// The injected candidate list, if any.
    pub fn test_paths(&self) -> Option<&[String]> {
        self.test_paths.as_deref()
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    /// Render the directory part. Values in `overrides` win over `base`.
    pub fn create_path_name(&self, base: Option<&Fields>, overrides: &Fields) -> Result<String, FisherError> {
        self.path.render(&Fields::merge(base, overrides))
    }

    pub fn create_file_name(&self, base: Option<&Fields>, overrides: &Fields) -> Result<String, FisherError> {
        self.file.render(&Fields::merge(base, overrides))
    }

    pub fn create_full_name(&self, base: Option<&Fields>, overrides: &Fields) -> Result<String, FisherError> {
        self.full.render(&Fields::merge(base, overrides))
    }

    // ── Searching ─────────────────────────────────────────────────────────

    /// Start a chained search. See [`Query`].
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// Find directories matching the path pattern.
    ///
    /// Rows are keyed by the directory followed by `*`, e.g. `a1/foo/*`.
    pub fn find_paths(&self, criteria: &Criteria, options: FindOptions) -> Result<FileContainer, FisherError> {
        self.find(Level::Paths, criteria, options)
    }

    /// Find files matching the full pattern.
    pub fn find_files(&self, criteria: &Criteria, options: FindOptions) -> Result<FileContainer, FisherError> {
        self.find(Level::Files, criteria, options)
    }

    /// Like [`find_paths`](Self::find_paths) but exactly one row must remain.
    pub fn find_single_path(&self, criteria: &Criteria, options: FindOptions) -> Result<FileContainer, FisherError> {
        exactly_one(self.find_paths(criteria, options)?, criteria)
    }

    /// Like [`find_files`](Self::find_files) but exactly one row must remain.
    pub fn find_single_file(&self, criteria: &Criteria, options: FindOptions) -> Result<FileContainer, FisherError> {
        exactly_one(self.find_files(criteria, options)?, criteria)
    }

    fn find(&self, level: Level, criteria: &Criteria, options: FindOptions) -> Result<FileContainer, FisherError> {
        let (pattern, glob) = match level {
            Level::Paths => (&self.path, format!("{}*", self.path.to_glob(criteria))),
            Level::Files => (&self.full, self.full.to_glob(criteria)),
        };

        let filters = ValueFilter::build(pattern, criteria)?;

        let mut candidates = self.source.enumerate(&glob)?;
        if level == Level::Paths {
            candidates = directory_prefixes(candidates);
        }
        tracing::debug!(glob = %glob, candidates = candidates.len(), ?level, "enumerated candidates");

        let mut rows = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let Some(values) = pattern.captures(&candidate) else {
                let err = FisherError::Parse {
                    path:    candidate,
                    pattern: pattern.as_str().to_string(),
                };
                match options.on_parse_error {
                    OnParseError::Raise  => return Err(err),
                    OnParseError::Warn   => self.reporter.report(Notice::new(NoticeKind::ParseFailure, err.to_string())),
                    OnParseError::Ignore => {}
                }
                continue;
            };

            if !filters.iter().all(|f| f.accepts(&values)) {
                continue;
            }

            let path = match level {
                Level::Paths => format!("{candidate}*"),
                Level::Files => candidate,
            };
            rows.push(Row { path, values });
        }

        assert_unique(rows.iter().map(|r| r.values.as_slice()))?;

        if rows.is_empty() {
            let err = FisherError::Empty(glob);
            match options.on_empty {
                OnEmpty::Raise => return Err(err),
                OnEmpty::Warn  => self.reporter.report(Notice::new(NoticeKind::EmptyResult, err.to_string())),
                OnEmpty::Allow => {}
            }
        }

        Ok(FileContainer::from_rows(
            pattern.keys().to_vec(),
            rows,
            Arc::clone(&self.reporter),
        ))
    }
}

fn exactly_one(found: FileContainer, criteria: &Criteria) -> Result<FileContainer, FisherError> {
    match found.len() {
        1 => Ok(found),
        0 => Err(FisherError::NoneFound(criteria.to_string())),
        n => Err(FisherError::MoreThanOne(n)),
    }
}

/// Reduce candidates to their distinct directory parts, keeping first-seen order.
fn directory_prefixes(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|c| match c.rfind('/') {
            Some(i) => c[..=i].to_string(),
            None => String::new(),
        })
        .filter(|dir| seen.insert(dir.clone()))
        .collect()
}

/// Collapse repeated separators and drop `./` prefixes and trailing `/`.
fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let parts: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

// ---------------------------------------------------------------------------
// Value filters
// ---------------------------------------------------------------------------

enum ValueMatcher {
    Exact(String),
    Glob(GlobMatcher),
}

impl ValueMatcher {
    fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Exact(v) => v == value,
            Self::Glob(g)  => g.is_match(value),
        }
    }
}

/// Checks one parsed field against its allowed values.
struct ValueFilter {
    index:   usize,
    allowed: Vec<ValueMatcher>,
}

impl ValueFilter {
    fn build(pattern: &Pattern, criteria: &Criteria) -> Result<Vec<ValueFilter>, FisherError> {
        let mut filters = Vec::new();
        for (field, values) in criteria.iter() {
            let Some(index) = pattern.keys().iter().position(|k| k == field) else {
                tracing::debug!(field, pattern = %pattern, "ignoring criterion for unknown field");
                continue;
            };

            let allowed = values
                .iter()
                .map(|v| {
                    if has_wildcard(v) {
                        compile_glob(&value_glob(v)).map(ValueMatcher::Glob)
                    } else {
                        Ok(ValueMatcher::Exact(v.clone()))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            filters.push(ValueFilter { index, allowed });
        }
        Ok(filters)
    }

    fn accepts(&self, values: &[String]) -> bool {
        let value = &values[self.index];
        self.allowed.iter().any(|m| m.is_match(value))
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

impl fmt::Display for FileFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.keys().iter().map(|k| format!("'{k}'")).collect();
        writeln!(f, "<FileFinder>")?;
        writeln!(f, "path_pattern: '{}'", self.path_pattern())?;
        writeln!(f, "file_pattern: '{}'", self.file_pattern())?;
        writeln!(f)?;
        writeln!(f, "keys: {}", keys.join(", "))
    }
}

impl fmt::Debug for FileFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileFinder")
            .field("path_pattern", &self.path_pattern())
            .field("file_pattern", &self.file_pattern())
            .field("test_paths", &self.test_paths)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::report::CollectingReporter;

    fn rows(fc: &FileContainer) -> Vec<(String, Vec<(String, String)>)> {
        fc.iter()
            .map(|r| {
                let fields = r.fields().map(|(k, v)| (k.to_string(), v.to_string())).collect();
                (r.path().to_string(), fields)
            })
            .collect()
    }

    fn allow() -> FindOptions {
        FindOptions {
            on_empty: OnEmpty::Allow,
            ..Default::default()
        }
    }

    #[test]
    fn file_pattern_cannot_contain_separator() {
        let err = FileFinder::new("path_pattern", "file/pattern").unwrap_err();
        assert!(err.to_string().contains("cannot contain path separator"));
    }

    #[test]
    fn path_pattern_gets_trailing_separator() {
        let ff = FileFinder::new("path_pattern", "file_pattern").unwrap();
        assert_eq!(ff.path_pattern(), "path_pattern/");
        assert_eq!(ff.file_pattern(), "file_pattern");
        assert_eq!(ff.full_pattern(), "path_pattern/file_pattern");
        assert_eq!(ff.full().as_str(), ff.full_pattern());

        let ff = FileFinder::new("path_pattern/", "file_pattern").unwrap();
        assert_eq!(ff.path_pattern(), "path_pattern/");

        assert_eq!(FileFinder::new("", "a").unwrap().path_pattern(), "");
    }

    #[test]
    fn invalid_placeholders_in_either_pattern() {
        for name in ["keys", "on_parse_error", "_allow_empty"] {
            let p = format!("{{{name}}}");
            let msg = format!("'{name}' is not a valid placeholder");
            assert!(FileFinder::new("", &p).unwrap_err().to_string().contains(&msg));
            assert!(FileFinder::new(&p, "").unwrap_err().to_string().contains(&msg));
        }
        for p in ["{}", "{_fixed}"] {
            let msg = "Only named fields are currently allowed";
            assert!(FileFinder::new("", p).unwrap_err().to_string().contains(msg));
            assert!(FileFinder::new(p, "").unwrap_err().to_string().contains(msg));
        }
    }

    #[test]
    fn keys_union_path_then_file() {
        let ff = FileFinder::new("{ab}_{c}", "{a}_{b}_{c}").unwrap();
        assert_eq!(ff.keys(), ["ab", "c", "a", "b"]);
        assert_eq!(ff.keys_file(), ["a", "b", "c"]);
        assert_eq!(ff.keys_path(), ["ab", "c"]);
    }

    #[test]
    fn display() {
        let ff = FileFinder::new("/{a}/{b}", "{b}_{c}").unwrap();
        let expected = "\
<FileFinder>
path_pattern: '/{a}/{b}/'
file_pattern: '{b}_{c}'

keys: 'a', 'b', 'c'
";
        assert_eq!(ff.to_string(), expected);

        let ff = FileFinder::new("{a}", "file_pattern").unwrap();
        assert!(ff.to_string().ends_with("keys: 'a'\n"));
    }

    #[test]
    fn test_paths_are_stored_and_must_be_unique() {
        let ff = FileFinder::new("a", "b").unwrap();
        assert!(ff.test_paths().is_none());

        let ff = ff.with_test_paths(["path"]).unwrap();
        assert_eq!(ff.test_paths().unwrap(), ["path"]);

        for dup in [vec!["a", "a"], vec!["a/", "a/"], vec!["a/b", "a/b"], vec!["a//b/", "a/b"]] {
            let err = FileFinder::new("a", "").unwrap().with_test_paths(dup).unwrap_err();
            assert!(err.to_string().contains("`test_paths` are not unique"));
            assert_eq!(err.kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn create_names() {
        let ff = FileFinder::new("{a}/{b}", "{b}_{c}").unwrap();
        fn kw(pairs: &[(&str, &str)]) -> Fields {
            pairs.iter().copied().collect()
        }

        assert_eq!(ff.create_path_name(None, &kw(&[("a", "a"), ("b", "b")])).unwrap(), "a/b/");
        assert_eq!(ff.create_file_name(None, &kw(&[("b", "b"), ("c", "c")])).unwrap(), "b_c");
        assert_eq!(
            ff.create_full_name(None, &kw(&[("a", "a"), ("b", "b"), ("c", "c")])).unwrap(),
            "a/b/b_c"
        );

        // explicit values win over the base mapping
        let base = kw(&[("a", "XXX"), ("b", "b")]);
        assert_eq!(ff.create_path_name(Some(&base), &kw(&[("a", "a")])).unwrap(), "a/b/");
        assert_eq!(
            ff.create_full_name(Some(&base), &kw(&[("a", "a"), ("c", "c")])).unwrap(),
            "a/b/b_c"
        );

        let err = ff.create_file_name(None, &kw(&[("b", "b")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn find_paths_collapses_directories() {
        let ff = FileFinder::new("{cat}", "").unwrap().with_test_paths(["a/a", "a/b"]).unwrap();
        let found = ff.find_paths(&Criteria::new(), FindOptions::default()).unwrap();
        assert_eq!(rows(&found), [("a/*".to_string(), vec![("cat".to_string(), "a".to_string())])]);
    }

    #[test]
    fn scalar_numbers_match_their_string_form() {
        let ff = FileFinder::new("{path}", "{file}")
            .unwrap()
            .with_test_paths(["1/1", "2/2"])
            .unwrap();

        let found = ff.find_paths(&Criteria::new().with("path", 1), FindOptions::default()).unwrap();
        assert_eq!(found.paths().collect::<Vec<_>>(), ["1/*"]);
        assert_eq!(found.columns(), ["path"]);

        let found = ff.find_files(&Criteria::new().with("file", 1), FindOptions::default()).unwrap();
        assert_eq!(found.paths().collect::<Vec<_>>(), ["1/1"]);
        assert_eq!(found.get(0).unwrap().values(), ["1", "1"]);
    }

    #[test]
    fn non_unique_metadata_is_an_error() {
        let ff = FileFinder::new("", "{cat}").unwrap().with_source(StaticSource::new(["a", "a"]));
        let err = ff.find_files(&Criteria::new(), FindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Uniqueness);
        assert!(err.to_string().contains("Non-unique metadata detected"));
    }

    #[test]
    fn unparsable_candidates_follow_policy() {
        let ff = FileFinder::new("{cat}", "{cat}").unwrap().with_test_paths(["a/b"]).unwrap();

        let err = ff.find_files(&Criteria::new(), FindOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Could not parse 'a/b' with the pattern '{cat}/{cat}'");

        let reporter = Arc::new(CollectingReporter::new());
        let ff = ff.with_reporter(reporter.clone());
        let opts = FindOptions {
            on_parse_error: OnParseError::Warn,
            on_empty:       OnEmpty::Allow,
        };
        let found = ff.find_files(&Criteria::new(), opts).unwrap();
        assert!(found.is_empty());
        assert_eq!(found.columns(), ["cat"]);

        let notices = reporter.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::ParseFailure);
        assert!(notices[0].message.contains("Could not parse 'a/b' with the pattern '{cat}/{cat}'"));

        let opts = FindOptions {
            on_parse_error: OnParseError::Ignore,
            on_empty:       OnEmpty::Allow,
        };
        assert!(ff.find_files(&Criteria::new(), opts).unwrap().is_empty());
        assert!(reporter.notices().is_empty());
    }

    #[test]
    fn ignore_keeps_parsable_rows() {
        let ff = FileFinder::new("{cat}", "{cat}").unwrap().with_test_paths(["a/b", "a/a"]).unwrap();
        let opts = FindOptions {
            on_parse_error: OnParseError::Ignore,
            ..Default::default()
        };
        let found = ff.find_files(&Criteria::new(), opts).unwrap();
        assert_eq!(rows(&found), [("a/a".to_string(), vec![("cat".to_string(), "a".to_string())])]);

        let err = ff.find_files(&Criteria::new(), FindOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'a/b'"));
    }

    #[test]
    fn repeated_fields_in_one_level() {
        let ff = FileFinder::new("", "{cat}_{cat}").unwrap().with_test_paths(["a_b"]).unwrap();
        let err = ff.find_files(&Criteria::new(), FindOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Could not parse 'a_b' with the pattern '{cat}_{cat}'");

        let ff = FileFinder::new("{cat}_{cat}", "").unwrap().with_test_paths(["a_b/"]).unwrap();
        let err = ff.find_files(&Criteria::new(), FindOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'a_b/' with the pattern '{cat}_{cat}/'"));
        let err = ff.find_paths(&Criteria::new(), FindOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'a_b/' with the pattern '{cat}_{cat}/'"));
    }

    #[test]
    fn empty_results_follow_policy() {
        let reporter = Arc::new(CollectingReporter::new());
        let ff = FileFinder::new("{a}/foo", "{file}")
            .unwrap()
            .with_test_paths(["a1/foo/file"])
            .unwrap()
            .with_reporter(reporter.clone());
        let c = Criteria::new().with("a", "XXX");

        let err = ff.find_files(&c, FindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
        assert!(err.to_string().contains("Found no files matching criteria"));
        assert!(err.to_string().contains("XXX/foo/*"));

        let warn = FindOptions {
            on_empty: OnEmpty::Warn,
            ..Default::default()
        };
        let found = ff.find_files(&c, warn).unwrap();
        assert!(found.is_empty());
        assert_eq!(found.columns(), ["a", "file"]);
        let notices = reporter.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::EmptyResult);

        let found = ff.find_paths(&c, allow()).unwrap();
        assert!(found.is_empty());
        assert_eq!(found.columns(), ["a"]);
        assert!(reporter.notices().is_empty());
    }

    #[test]
    fn wildcard_value_matches_everything() {
        let ff = FileFinder::new("{a}/{b}", "file")
            .unwrap()
            .with_test_paths(["X/a1/foo/file", "X/a2/foo/file"])
            .unwrap();
        // `X/` is not covered by the pattern, so nothing lines up
        let err = ff.find_paths(&Criteria::new().with("b", "foo"), FindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);

        let ff = FileFinder::new("X/{a}/{b}", "file")
            .unwrap()
            .with_test_paths(["X/a1/foo/file", "X/a2/foo/file"])
            .unwrap();
        let found = ff
            .find_paths(&Criteria::new().with("a", "*").with("b", "foo"), FindOptions::default())
            .unwrap();
        assert_eq!(found.paths().collect::<Vec<_>>(), ["X/a1/foo/*", "X/a2/foo/*"]);
        assert_eq!(found.get(1).unwrap().get("a"), Some("a2"));
    }

    #[test]
    fn class_and_brace_characters_are_literal_values() {
        let ff = FileFinder::new("{a}", "file")
            .unwrap()
            .with_test_paths(["x[1]/file", "x1/file", "x{1/file"])
            .unwrap();

        let found = ff.query().with("a", "x[1]").files().unwrap();
        assert_eq!(found.paths().collect::<Vec<_>>(), ["x[1]/file"]);

        let found = ff.query().with("a", "x{1").files().unwrap();
        assert_eq!(found.paths().collect::<Vec<_>>(), ["x{1/file"]);

        let found = ff.query().with("a", ["x[1]", "x1"]).files().unwrap();
        assert_eq!(found.paths().collect::<Vec<_>>(), ["x[1]/file", "x1/file"]);

        let found = ff.query().with("a", ["x?", "zz"]).files().unwrap();
        assert_eq!(found.paths().collect::<Vec<_>>(), ["x1/file"]);

        let err = ff.query().with("a", "x{2").files().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn single_result_cardinality() {
        let ff = FileFinder::new("{a}/foo", "file")
            .unwrap()
            .with_test_paths(["a1/foo/file", "a2/foo/file"])
            .unwrap();

        let err = ff.find_single_path(&Criteria::new(), FindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cardinality);
        assert!(err.to_string().contains("Found more than one (2) files/ paths"));

        let err = ff.find_single_file(&Criteria::new().with("a", "a3"), FindOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Found no files matching criteria"));
        assert_eq!(err.kind(), ErrorKind::EmptyResult);

        let err = ff.find_single_file(&Criteria::new().with("a", "a3"), allow()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cardinality);
        assert_eq!(
            err.to_string(),
            "Found no files matching criteria (a='a3'), expected exactly one but found 0"
        );

        let one = ff.find_single_path(&Criteria::new().with("a", "a1"), FindOptions::default()).unwrap();
        assert_eq!(one.paths().collect::<Vec<_>>(), ["a1/foo/*"]);
    }

    #[test]
    fn unknown_criteria_are_ignored() {
        let ff = FileFinder::new("{a}", "file").unwrap().with_test_paths(["x/file"]).unwrap();
        let found = ff.find_files(&Criteria::new().with("zzz", ["1", "2"]), FindOptions::default()).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize("a//b/"), "a/b");
        assert_eq!(normalize("./a/b"), "a/b");
        assert_eq!(normalize("/a/"), "/a");
    }
}
