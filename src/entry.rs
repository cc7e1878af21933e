use std::collections::BTreeMap;

/// One resolved path and its values, aligned with the container's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    pub path:   String,
    pub values: Vec<String>,
}

/// A borrowed view of one row of a [`FileContainer`](crate::FileContainer).
///
/// Field values are always strings, exactly as captured from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    path:    &'a str,
    columns: &'a [String],
    values:  &'a [String],
}

impl<'a> Record<'a> {
    pub(crate) fn new(path: &'a str, columns: &'a [String], values: &'a [String]) -> Self {
        Self { path, columns, values }
    }

    /// The row key: the file path, or the directory glob for path searches.
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == field)
            .map(|i| self.values[i].as_str())
    }

    /// `(field, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Values in column order.
    pub fn values(&self) -> &'a [String] {
        self.values
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.fields()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
