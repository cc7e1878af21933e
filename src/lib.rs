//! # filefisher
//!
//! Find files by placeholder patterns and parse their names into metadata.
//!
//! Declare where files live with named placeholders, e.g.
//! `"{model}/{scenario}"` for directories and `"{variable}_{model}.nc"` for
//! file names. filefisher turns the patterns into globs to enumerate
//! candidates without opening anything, parses every candidate back into
//! field values, and returns a [`FileContainer`]: one row per path, one
//! column per field.
//!
//! # Quick Start
//!
//! ```rust
//! use filefisher::{Criteria, FileFinder, FindOptions};
//!
//! let finder = filefisher::create_finder("{model}/{scen}", "{var}_{model}.nc")?
//!     .with_test_paths([
//!         "mpi/ssp585/tas_mpi.nc",
//!         "mpi/ssp126/tas_mpi.nc",
//!         "cesm/ssp585/pr_cesm.nc",
//!     ])?;
//!
//! let found = finder.find_files(
//!     &Criteria::new().with("scen", "ssp585"),
//!     FindOptions::default(),
//! )?;
//!
//! assert_eq!(found.len(), 2);
//! for record in &found {
//!     println!("{} -> {:?}", record.path(), record.to_map());
//! }
//!
//! let name = finder.create_full_name(
//!     None,
//!     &[("model", "mpi"), ("scen", "ssp245"), ("var", "tas")].into_iter().collect(),
//! )?;
//! assert_eq!(name, "mpi/ssp245/tas_mpi.nc");
//! # Ok::<(), filefisher::FisherError>(())
//! ```
//!
//! # Custom Sources
//!
//! Searches go to the local filesystem by default ([`FsSource`]). Implement
//! [`Source`] to search a remote listing or an index instead:
//!
//! ```rust
//! use filefisher::{FileFinder, FisherError, Source};
//!
//! struct Listing(Vec<String>);
//!
//! impl Source for Listing {
//!     fn enumerate(&self, _glob: &str) -> Result<Vec<String>, FisherError> {
//!         // a real listing would narrow by `glob`; the finder re-parses anyway
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! let finder = FileFinder::new("{year}", "{month}.csv")?
//!     .with_source(Listing(vec!["2024/01.csv".into(), "2024/02.csv".into()]));
//!
//! let found = finder.query().with("month", "02").files()?;
//! assert_eq!(found.paths().collect::<Vec<_>>(), ["2024/02.csv"]);
//! # Ok::<(), FisherError>(())
//! ```

#![forbid(unsafe_code)]

pub mod criteria;
pub mod engine;
pub mod pattern;
pub mod policy;

mod builder;
mod entry;
mod error;
mod finder;
mod report;
mod results;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::Query;
pub use criteria::{Criteria, Fields, IntoValue, IntoValues};
pub use engine::{FsSource, StaticSource};
pub use entry::Record;
pub use error::{ErrorKind, FisherError};
pub use finder::FileFinder;
pub use pattern::Pattern;
pub use policy::{FindOptions, OnEmpty, OnParseError};
pub use report::{CollectingReporter, Notice, NoticeKind, TracingReporter};
pub use results::{assert_unique, FileContainer, Iter};
pub use traits::{Reporter, Source};

// ── Entry points ──────────────────────────────────────────────────────────────

/// Compile a placeholder pattern.
///
/// ```rust
/// let pattern = filefisher::compile_pattern("{model}_{var}.nc")?;
/// assert_eq!(pattern.keys(), ["model", "var"]);
/// assert_eq!(pattern.glob_template(), "*_*.nc");
/// # Ok::<(), filefisher::FisherError>(())
/// ```
pub fn compile_pattern(pattern: &str) -> Result<Pattern, FisherError> {
    Pattern::compile(pattern)
}

/// Create a [`FileFinder`] from a path pattern and a file pattern.
pub fn create_finder(path_pattern: &str, file_pattern: &str) -> Result<FileFinder, FisherError> {
    FileFinder::new(path_pattern, file_pattern)
}
