use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::criteria::Criteria;
use crate::entry::{Record, Row};
use crate::error::FisherError;
use crate::report::{Notice, NoticeKind, TracingReporter};
use crate::traits::Reporter;

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

/// Fail if two metadata tuples are identical.
///
/// Only the field values are compared; paths are ignored. Downstream code
/// indexes results by metadata, so two paths carrying the same values would
/// be indistinguishable there.
pub fn assert_unique<'a, I>(tuples: I) -> Result<(), FisherError>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut seen = HashSet::new();
    for tuple in tuples {
        if !seen.insert(tuple) {
            return Err(FisherError::NonUnique(format!("{tuple:?} occurs more than once")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// FileContainer
// ---------------------------------------------------------------------------

/// The result of a search: rows keyed by unique path, one column per field.
///
/// Containers are never modified in place. [`search`](Self::search) and
/// [`select`](Self::select) build new ones.
#[derive(Clone)]
pub struct FileContainer {
    columns:  Vec<String>,
    rows:     Vec<Row>,
    reporter: Arc<dyn Reporter>,
}

impl FileContainer {
    /// Build a container from `(path, values)` rows.
    ///
    /// Every row needs one value per column and paths must be unique.
    pub fn new<C, S>(columns: C, rows: Vec<(String, Vec<String>)>) -> Result<Self, FisherError>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        let mut paths = HashSet::new();
        let mut checked = Vec::with_capacity(rows.len());
        for (path, values) in rows {
            if values.len() != columns.len() {
                return Err(FisherError::RowWidth {
                    path,
                    got:      values.len(),
                    expected: columns.len(),
                });
            }
            if !paths.insert(path.clone()) {
                return Err(FisherError::NonUnique(format!("path '{path}' occurs more than once")));
            }
            checked.push(Row { path, values });
        }

        Ok(Self {
            columns,
            rows: checked,
            reporter: Arc::new(TracingReporter),
        })
    }

    /// An empty container with the given columns.
    pub fn empty<C, S>(columns: C) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns:  columns.into_iter().map(Into::into).collect(),
            rows:     Vec::new(),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Route deprecation notices to `reporter` instead of `tracing`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.path.as_str())
    }

    pub fn get(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|r| self.record(r))
    }

    /// Look a row up by its path.
    pub fn get_path(&self, path: &str) -> Option<Record<'_>> {
        self.rows.iter().find(|r| r.path == path).map(|r| self.record(r))
    }

    /// A new container holding the rows at `indices`, in that order.
    ///
    /// Returns `None` if any index is out of range.
    pub fn select(&self, indices: &[usize]) -> Option<FileContainer> {
        let rows = indices
            .iter()
            .map(|&i| self.rows.get(i).cloned())
            .collect::<Option<Vec<_>>>()?;
        Some(self.with_rows(rows))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            container: self,
            rows:      self.rows.iter(),
        }
    }

    /// Rows whose value for every constrained field is one of the allowed values.
    ///
    /// Searching without criteria returns an empty container, never everything.
    pub fn search(&self, criteria: &Criteria) -> Result<FileContainer, FisherError> {
        if criteria.is_empty() {
            return Ok(self.with_rows(Vec::new()));
        }

        let mut constraints = Vec::with_capacity(criteria.len());
        for (field, allowed) in criteria.iter() {
            constraints.push((self.column_index(field)?, allowed));
        }

        let rows = self
            .rows
            .iter()
            .filter(|row| {
                constraints
                    .iter()
                    .all(|(i, allowed)| allowed.contains(&row.values[*i]))
            })
            .cloned()
            .collect();

        Ok(self.with_rows(rows))
    }

    /// Join each row's values (in column order) with `sep`, keyed by path.
    pub fn combine_keys(&self, sep: &str) -> Vec<(String, String)> {
        self.rows
            .iter()
            .map(|r| (r.path.clone(), r.values.join(sep)))
            .collect()
    }

    /// Like [`combine_keys`](Self::combine_keys) but only for `keys`, in that order.
    pub fn combine_selected_keys(
        &self,
        keys: &[&str],
        sep: &str,
    ) -> Result<Vec<(String, String)>, FisherError> {
        let indices = keys
            .iter()
            .map(|k| self.column_index(k))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .rows
            .iter()
            .map(|r| {
                let parts: Vec<&str> = indices.iter().map(|&i| r.values[i].as_str()).collect();
                (r.path.clone(), parts.join(sep))
            })
            .collect())
    }

    #[deprecated(note = "use `combine_keys` instead")]
    pub fn combine_by_key(&self, sep: &str) -> Vec<(String, String)> {
        self.reporter.report(Notice::new(
            NoticeKind::Deprecated,
            "`combine_by_key` has been deprecated and will be removed, use `combine_keys` instead",
        ));
        self.combine_keys(sep)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    pub(crate) fn from_rows(columns: Vec<String>, rows: Vec<Row>, reporter: Arc<dyn Reporter>) -> Self {
        Self { columns, rows, reporter }
    }

    fn with_rows(&self, rows: Vec<Row>) -> FileContainer {
        FileContainer {
            columns:  self.columns.clone(),
            rows,
            reporter: Arc::clone(&self.reporter),
        }
    }

    fn record<'a>(&'a self, row: &'a Row) -> Record<'a> {
        Record::new(&row.path, &self.columns, &row.values)
    }

    fn column_index(&self, field: &str) -> Result<usize, FisherError> {
        self.columns
            .iter()
            .position(|c| c == field)
            .ok_or_else(|| FisherError::UnknownField {
                field:     field.to_string(),
                available: self.columns.join(", "),
            })
    }
}

impl fmt::Debug for FileContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContainer")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FileContainer {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}

impl fmt::Display for FileContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<FileContainer>")?;

        let header: Vec<&str> = std::iter::once("path")
            .chain(self.columns.iter().map(String::as_str))
            .collect();
        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            widths[0] = widths[0].max(row.path.len());
            for (w, v) in widths[1..].iter_mut().zip(&row.values) {
                *w = (*w).max(v.len());
            }
        }

        let line = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:<w$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{}", line(header.clone()))?;
        for row in &self.rows {
            let cells = std::iter::once(row.path.as_str())
                .chain(row.values.iter().map(String::as_str))
                .collect();
            writeln!(f, "{}", line(cells))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Iteration
// ---------------------------------------------------------------------------

/// Iterator over the rows of a [`FileContainer`].
pub struct Iter<'a> {
    container: &'a FileContainer,
    rows:      std::slice::Iter<'a, Row>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|r| self.container.record(r))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a FileContainer {
    type Item = Record<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;

    fn row(path: &str, values: &[&str]) -> (String, Vec<String>) {
        (path.to_string(), values.iter().map(|v| v.to_string()).collect())
    }

    fn example() -> FileContainer {
        FileContainer::new(
            ["model", "scen", "res"],
            vec![
                row("file0", &["a", "d", "r"]),
                row("file1", &["a", "h", "r"]),
                row("file2", &["b", "h", "r"]),
                row("file3", &["b", "d", "r"]),
                row("file4", &["c", "d", "r"]),
            ],
        )
        .unwrap()
    }

    fn paths(fc: &FileContainer) -> Vec<&str> {
        fc.paths().collect()
    }

    #[test]
    fn empty_container() {
        let fc = FileContainer::empty(["cat"]);
        assert_eq!(fc.len(), 0);
        assert!(fc.is_empty());
        assert_eq!(fc.columns(), ["cat"]);
        assert!(fc.iter().next().is_none());
    }

    #[test]
    fn iterates_in_row_order() {
        let fc = example();
        assert_eq!(fc.len(), 5);

        let first = fc.iter().next().unwrap();
        assert_eq!(first.path(), "file0");
        assert_eq!(first.get("scen"), Some("d"));
        assert_eq!(
            first.fields().collect::<Vec<_>>(),
            [("model", "a"), ("scen", "d"), ("res", "r")]
        );

        let all: Vec<&str> = fc.iter().map(|r| r.path()).collect();
        assert_eq!(all, ["file0", "file1", "file2", "file3", "file4"]);
        assert_eq!((&fc).into_iter().len(), 5);
    }

    #[test]
    fn rejects_ragged_rows_and_duplicate_paths() {
        let err = FileContainer::new(["a", "b"], vec![row("p", &["x"])]).unwrap_err();
        assert!(matches!(err, FisherError::RowWidth { got: 1, expected: 2, .. }));

        let err = FileContainer::new(["a"], vec![row("p", &["x"]), row("p", &["y"])]).unwrap_err();
        assert!(matches!(err, FisherError::NonUnique(_)));
    }

    #[test]
    fn search_without_criteria_is_empty() {
        let fc = example();
        let found = fc.search(&Criteria::new()).unwrap();
        assert!(found.is_empty());
        assert_eq!(found.columns(), fc.columns());
    }

    #[test]
    fn search_by_membership() {
        let fc = example();

        assert!(fc.search(&Criteria::new().with("model", "d")).unwrap().is_empty());

        let found = fc.search(&Criteria::new().with("model", "a")).unwrap();
        assert_eq!(paths(&found), ["file0", "file1"]);

        let found = fc.search(&Criteria::new().with("model", ["a", "c"])).unwrap();
        assert_eq!(paths(&found), ["file0", "file1", "file4"]);

        let found = fc.search(&Criteria::new().with("model", "a").with("scen", "h")).unwrap();
        assert_eq!(paths(&found), ["file1"]);

        let found = fc
            .search(&Criteria::new().with("model", ["a", "b"]).with("scen", "d"))
            .unwrap();
        assert_eq!(paths(&found), ["file0", "file3"]);

        let err = fc.search(&Criteria::new().with("nope", "x")).unwrap_err();
        assert!(matches!(err, FisherError::UnknownField { .. }));
    }

    #[test]
    fn select_rows() {
        let fc = example();
        let picked = fc.select(&[4, 0]).unwrap();
        assert_eq!(paths(&picked), ["file4", "file0"]);
        assert!(fc.select(&[5]).is_none());
        assert_eq!(fc.get_path("file2").unwrap().get("model"), Some("b"));
    }

    #[test]
    fn combine_keys_joins_values() {
        let fc = example();
        let one = fc.select(&[0]).unwrap();
        assert_eq!(one.combine_keys("."), [("file0".to_string(), "a.d.r".to_string())]);

        let piped = fc.combine_keys("|");
        assert_eq!(piped.len(), 5);
        assert_eq!(piped[2], ("file2".to_string(), "b|h|r".to_string()));

        let partial = fc.combine_selected_keys(&["model", "res"], ".").unwrap();
        assert_eq!(partial[3].1, "b.r");
        assert!(fc.combine_selected_keys(&["x"], ".").is_err());
    }

    #[test]
    #[allow(deprecated)]
    fn combine_by_key_reports_deprecation() {
        let reporter = Arc::new(CollectingReporter::new());
        let fc = example().select(&[0]).unwrap().with_reporter(reporter.clone());

        assert_eq!(fc.combine_by_key(".")[0].1, "a.d.r");

        let notices = reporter.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Deprecated);
        assert!(notices[0].message.contains("`combine_by_key` has been deprecated"));
    }

    #[test]
    fn assert_unique_compares_metadata_only() {
        let ok = [
            vec!["a".to_string(), "d".to_string()],
            vec!["a".to_string(), "h".to_string()],
        ];
        assert!(assert_unique(ok.iter().map(Vec::as_slice)).is_ok());

        let dup = [
            vec!["a".to_string(), "d".to_string()],
            vec!["a".to_string(), "d".to_string()],
        ];
        let err = assert_unique(dup.iter().map(Vec::as_slice)).unwrap_err();
        assert!(err.to_string().starts_with("Non-unique metadata detected"));
    }

    #[test]
    fn display_renders_table() {
        let fc = example().select(&[0, 2]).unwrap();
        let expected = "\
<FileContainer>
path   model  scen  res
file0  a      d     r
file2  b      h     r
";
        assert_eq!(fc.to_string(), expected);
    }
}
