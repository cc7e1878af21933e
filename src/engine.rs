use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use globset::{GlobBuilder, GlobMatcher};
use ignore::{DirEntry, WalkBuilder, WalkState};

use crate::error::FisherError;
use crate::traits::Source;

// ---------------------------------------------------------------------------
// Glob compilation
// ---------------------------------------------------------------------------

/// Compile `glob` so that `*`, `?` and `[...]` stay inside one path segment.
pub(crate) fn compile_glob(glob: &str) -> Result<GlobMatcher, FisherError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| FisherError::InvalidGlob {
            glob:   glob.to_string(),
            reason: e.to_string(),
        })
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '[', '{', '\\'])
}

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Traversal parameters for a single enumeration.
pub(crate) struct WalkConfig {
    pub threads:   usize,
    pub max_depth: usize,
}

/// Split a glob into the directory to start walking from and the number of
/// segments below it. A depth of `0` means the glob is a plain path.
fn split_root(glob: &str) -> (String, usize) {
    let segments: Vec<&str> = glob.split('/').collect();

    let Some(first) = segments.iter().position(|s| has_glob_meta(s)) else {
        return (glob.to_string(), 0);
    };

    let root = segments[..first].join("/");
    let root = match (root.is_empty(), glob.starts_with('/')) {
        (false, _)    => root,
        (true, true)  => "/".to_string(),
        (true, false) => ".".to_string(),
    };
    (root, segments.len() - first)
}

// ---------------------------------------------------------------------------
// FsSource
// ---------------------------------------------------------------------------

/// Enumerates candidates on the local filesystem.
///
/// Walks from the longest literal directory prefix of the glob and only as
/// deep as the glob has segments, so directories outside the pattern are
/// never read. Results are sorted.
pub struct FsSource {
    threads: usize,
}

impl Default for FsSource {
    fn default() -> Self {
        Self { threads: num_cpus() }
    }
}

impl FsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads for the directory walk. Defaults to the logical core count.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n.max(1);
        self
    }
}

impl Source for FsSource {
    fn enumerate(&self, glob: &str) -> Result<Vec<String>, FisherError> {
        let dir_only = glob.len() > 1 && glob.ends_with('/');
        let trimmed  = if dir_only { glob.trim_end_matches('/') } else { glob };

        let (root, depth) = split_root(trimmed);

        if depth == 0 {
            let path = Path::new(trimmed);
            let keep = if dir_only { path.is_dir() } else { path.exists() };
            return Ok(if keep { vec![glob.to_string()] } else { Vec::new() });
        }

        let matcher = compile_glob(trimmed)?;
        let config = WalkConfig {
            threads:   self.threads,
            max_depth: depth,
        };

        let strip_dot = root == "." && !trimmed.starts_with("./");
        let mut found = walk(&root, &config, &matcher, dir_only, strip_dot);
        found.sort();
        found.dedup();

        tracing::debug!(glob, root = %root, candidates = found.len(), "enumerated filesystem");
        Ok(found)
    }
}

/// Walk `root` in parallel and collect paths at exactly `max_depth` that match.
///
/// With `strip_dot` the walker's `./` prefix is removed before matching, for
/// globs that start directly with a wildcard segment.
fn walk(
    root: &str,
    config: &WalkConfig,
    matcher: &GlobMatcher,
    dir_only: bool,
    strip_dot: bool,
) -> Vec<String> {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(true)
        .same_file_system(false)
        .max_depth(Some(config.max_depth))
        .threads(config.threads);

    let walker = builder.build_parallel();
    let found  = Arc::new(Mutex::new(Vec::<String>::new()));

    walker.run(|| {
        let found   = Arc::clone(&found);
        let matcher = matcher.clone();
        let target  = config.max_depth;

        Box::new(move |res: Result<DirEntry, ignore::Error>| -> WalkState {
            let entry = match res {
                Ok(e) => e,
                Err(e) => {
                    let err = map_ignore_error(e);
                    tracing::debug!(error = %err, path = ?err_path(&err), "skipping unreadable entry");
                    return WalkState::Continue;
                }
            };

            if entry.depth() != target {
                return WalkState::Continue;
            }

            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if dir_only && !is_dir {
                return WalkState::Continue;
            }

            let lossy = entry.path().to_string_lossy();
            let full: &str = &lossy;
            let path = if strip_dot {
                full.strip_prefix("./").unwrap_or(full)
            } else {
                full
            };

            if matcher.is_match(path) {
                let mut path = path.to_string();
                if dir_only {
                    path.push('/');
                }
                if let Ok(mut f) = found.lock() {
                    f.push(path);
                }
            }

            WalkState::Continue
        })
    });

    Arc::try_unwrap(found)
        .map(|m| m.into_inner().unwrap_or_default())
        .unwrap_or_else(|shared| shared.lock().map(|f| f.clone()).unwrap_or_default())
}

fn err_path(err: &FisherError) -> Option<&PathBuf> {
    match err {
        FisherError::Io { path, .. } => Some(path),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Map ignore::Error to FisherError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> FisherError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(source) => FisherError::Io { path, source },
            other => FisherError::Source(format!("{}: {other}", path.display())),
        },
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::Loop { child, .. } => {
            FisherError::Source(format!("symlink loop at {}", child.display()))
        }
        ignore::Error::Io(source) => FisherError::Io {
            path: PathBuf::new(),
            source,
        },
        other => FisherError::Source(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

/// A fixed list of candidate paths, filtered by glob in insertion order.
///
/// This is what [`FileFinder::with_test_paths`](crate::FileFinder::with_test_paths)
/// installs. Constructed directly it performs no uniqueness check.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    paths: Vec<String>,
}

impl StaticSource {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl Source for StaticSource {
    fn enumerate(&self, glob: &str) -> Result<Vec<String>, FisherError> {
        let matcher = compile_glob(glob)?;
        Ok(self
            .paths
            .iter()
            .filter(|p| matcher.is_match(p.as_str()))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
