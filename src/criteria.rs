//! Search criteria and render values.
//!
//! Every value handed to the crate goes through [`IntoValue`] once, so a
//! numeric constraint such as `1` is indistinguishable from `"1"` afterwards.

use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// A scalar accepted as a field value.
pub trait IntoValue {
    fn into_value(self) -> String;
}

/// One value or several alternatives for a field.
pub trait IntoValues {
    fn into_values(self) -> Vec<String>;
}

macro_rules! scalar_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> String {
                    self.to_string()
                }
            }

            impl IntoValues for $ty {
                fn into_values(self) -> Vec<String> {
                    vec![self.into_value()]
                }
            }
        )*
    };
}

scalar_values!(
    &str, String, &String, char, bool,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
);

impl<T: IntoValue> IntoValues for Vec<T> {
    fn into_values(self) -> Vec<String> {
        self.into_iter().map(IntoValue::into_value).collect()
    }
}

impl<T: IntoValue, const N: usize> IntoValues for [T; N] {
    fn into_values(self) -> Vec<String> {
        self.into_iter().map(IntoValue::into_value).collect()
    }
}

impl<T: IntoValue + Clone> IntoValues for &[T] {
    fn into_values(self) -> Vec<String> {
        self.iter().cloned().map(IntoValue::into_value).collect()
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Field constraints for a search. Several values for one field are a logical OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    fields: BTreeMap<String, Vec<String>>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `field`, replacing any earlier constraint on it.
    pub fn with(mut self, field: impl Into<String>, values: impl IntoValues) -> Self {
        self.insert(field, values);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, values: impl IntoValues) {
        self.fields.insert(field.into(), values.into_values());
    }

    /// `overrides` wins for every field present in both.
    pub fn merge(base: &Criteria, overrides: &Criteria) -> Criteria {
        let mut fields = base.fields.clone();
        for (k, v) in &overrides.fields {
            fields.insert(k.clone(), v.clone());
        }
        Criteria { fields }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// The value to substitute into a glob, if the field is pinned to exactly one.
    pub fn single(&self, field: &str) -> Option<&str> {
        match self.fields.get(field).map(Vec::as_slice) {
            Some([one]) => Some(one.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<K: Into<String>, V: IntoValues> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Criteria::new();
        for (k, v) in iter {
            criteria.insert(k, v);
        }
        criteria
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(k, v)| match v.as_slice() {
                [one] => format!("{k}='{one}'"),
                many => format!("{k}={many:?}"),
            })
            .collect();
        f.write_str(&parts.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// One value per field, used to render names from a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    values: BTreeMap<String, String>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl IntoValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl IntoValue) {
        self.values.insert(field.into(), value.into_value());
    }

    /// Layer `overrides` on top of `base`; `overrides` wins per field.
    pub fn merge(base: Option<&Fields>, overrides: &Fields) -> Fields {
        let mut values = base.map(|b| b.values.clone()).unwrap_or_default();
        for (k, v) in &overrides.values {
            values.insert(k.clone(), v.clone());
        }
        Fields { values }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
    }
}

impl<K: Into<String>, V: IntoValue> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl From<BTreeMap<String, String>> for Fields {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_coerced_to_strings() {
        let c = Criteria::new().with("path", 1).with("res", 2.5).with("flag", true);
        assert_eq!(c.get("path"), Some(&["1".to_string()][..]));
        assert_eq!(c.single("res"), Some("2.5"));
        assert_eq!(c.single("flag"), Some("true"));
    }

    #[test]
    fn sequences_are_alternatives() {
        let c = Criteria::new().with("a", ["a1", "a2"]).with("b", vec![1, 2]);
        assert_eq!(c.get("a").unwrap(), ["a1", "a2"]);
        assert_eq!(c.get("b").unwrap(), ["1", "2"]);
        // several values cannot be folded into a glob
        assert_eq!(c.single("a"), None);

        let slice: &[&str] = &["x"];
        assert_eq!(Criteria::new().with("x", slice).single("x"), Some("x"));
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = Criteria::new().with("a", "XXX").with("b", "foo");
        let kw = Criteria::new().with("a", "a1");
        let merged = Criteria::merge(&base, &kw);
        assert_eq!(merged.single("a"), Some("a1"));
        assert_eq!(merged.single("b"), Some("foo"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn fields_merge_with_optional_base() {
        let base: Fields = [("a", "XXX"), ("b", "b")].into_iter().collect();
        let kw = Fields::new().with("a", "a");
        let merged = Fields::merge(Some(&base), &kw);
        assert_eq!(merged.get("a"), Some("a"));
        assert_eq!(merged.get("b"), Some("b"));

        assert_eq!(Fields::merge(None, &kw), kw);
    }

    #[test]
    fn display_lists_constraints() {
        let c = Criteria::new().with("a", "x").with("b", ["y", "z"]);
        assert_eq!(c.to_string(), r#"a='x', b=["y", "z"]"#);
    }
}
