//! Placeholder patterns such as `"{model}/{scenario}/{variable}.nc"`.
//!
//! A [`Pattern`] is compiled once into an ordered list of literal and capture
//! tokens. From that list it derives a glob (every placeholder becomes `*`),
//! renders concrete names, and parses concrete names back into field values.
//!
//! Parsing walks the token list left to right. A capture is non-empty, never
//! crosses `/`, and is tried longest-first; when two placeholders touch
//! without a literal in between, the first one therefore takes as much as it
//! can and the second gets what is left. A name that appears more than once
//! must capture the same text at every occurrence.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::criteria::{Criteria, Fields};
use crate::error::FisherError;

/// Names the search API uses for its own options. They cannot be placeholders.
pub const RESERVED_NAMES: &[&str] = &["keys", "on_empty", "on_parse_error", "_allow_empty"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// Index into `Pattern::names`.
    Capture(usize),
}

/// A compiled placeholder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
    names:  Vec<String>,
}

impl Pattern {
    /// Compile `pattern`, validating every placeholder name.
    ///
    /// `{{` and `}}` stand for literal braces.
    pub fn compile(pattern: &str) -> Result<Self, FisherError> {
        let mut tokens  = Vec::new();
        let mut names   = Vec::<String>::new();
        let mut literal = String::new();
        let mut chars   = pattern.char_indices().peekable();

        let unbalanced = |position| FisherError::UnbalancedBrace {
            pattern: pattern.to_string(),
            position,
        };

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(unbalanced(pos)),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => return Err(unbalanced(pos)),
                            Some((_, ch)) => name.push(ch),
                        }
                    }
                    validate_name(&name, pattern)?;

                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    let index = match names.iter().position(|n| *n == name) {
                        Some(i) => i,
                        None => {
                            names.push(name);
                            names.len() - 1
                        }
                    };
                    tokens.push(Token::Capture(index));
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
            names,
        })
    }

    /// The pattern string this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first occurrence, each listed once.
    pub fn keys(&self) -> &[String] {
        &self.names
    }

    /// The pattern with every placeholder replaced by `*`.
    pub fn glob_template(&self) -> String {
        self.to_glob(&Criteria::new())
    }

    /// Build a glob, substituting fields pinned to a single value.
    ///
    /// Unconstrained fields and fields with several alternatives become `*`;
    /// narrowing those down is left to the caller after parsing.
    pub fn to_glob(&self, criteria: &Criteria) -> String {
        let mut glob = String::with_capacity(self.source.len());
        for token in &self.tokens {
            match token {
                Token::Literal(lit) => push_glob_literal(&mut glob, lit),
                Token::Capture(i) => match criteria.single(&self.names[*i]) {
                    Some(value) => push_glob_value(&mut glob, value),
                    None => glob.push('*'),
                },
            }
        }
        glob
    }

    /// Substitute every placeholder with its value from `values`.
    pub fn render(&self, values: &Fields) -> Result<String, FisherError> {
        let mut out = String::with_capacity(self.source.len());
        for token in &self.tokens {
            match token {
                Token::Literal(lit) => out.push_str(lit),
                Token::Capture(i) => {
                    let name = &self.names[*i];
                    let value = values.get(name).ok_or_else(|| FisherError::MissingField {
                        field:   name.clone(),
                        pattern: self.source.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Parse `input` into a field → value map.
    pub fn parse(&self, input: &str) -> Result<BTreeMap<String, String>, FisherError> {
        let values = self.captures(input).ok_or_else(|| FisherError::Parse {
            path:    input.to_string(),
            pattern: self.source.clone(),
        })?;
        Ok(self.names.iter().cloned().zip(values).collect())
    }

    /// Captured values aligned with [`keys`](Self::keys), or `None` if `input`
    /// does not match.
    pub fn captures(&self, input: &str) -> Option<Vec<String>> {
        let mut state = MatchState::new(self);
        if !self.match_from(input, 0, 0, &mut state) {
            return None;
        }
        state
            .spans
            .into_iter()
            .map(|span| span.map(|(start, end)| input[start..end].to_string()))
            .collect()
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.captures(input).is_some()
    }

    fn match_from(&self, input: &str, token: usize, pos: usize, state: &mut MatchState) -> bool {
        let Some(current) = self.tokens.get(token) else {
            return pos == input.len();
        };

        let key = (token, pos, state.bindings());
        if state.failed.contains(&key) {
            return false;
        }

        let rest = &input[pos..];
        let matched = match current {
            Token::Literal(lit) => {
                rest.starts_with(lit.as_str()) && self.match_from(input, token + 1, pos + lit.len(), state)
            }
            Token::Capture(i) => match state.spans[*i] {
                Some((start, end)) => {
                    let bound = &input[start..end];
                    rest.starts_with(bound) && self.match_from(input, token + 1, pos + bound.len(), state)
                }
                None => {
                    let segment = &rest[..rest.find('/').unwrap_or(rest.len())];
                    let ends: Vec<usize> = segment
                        .char_indices()
                        .map(|(i, c)| i + c.len_utf8())
                        .collect();

                    let mut found = false;
                    for end in ends.into_iter().rev() {
                        state.spans[*i] = Some((pos, pos + end));
                        if self.match_from(input, token + 1, pos + end, state) {
                            found = true;
                            break;
                        }
                    }
                    if !found {
                        state.spans[*i] = None;
                    }
                    found
                }
            },
        };

        if !matched {
            state.failed.insert(key);
        }
        matched
    }
}

type Span = (usize, usize);

/// Bookkeeping for one [`Pattern::captures`] call.
///
/// A dead end depends only on the token, the position and the values already
/// bound to names that occur again later, so failures are cached under that
/// key and adjacent placeholders stay polynomial.
struct MatchState {
    spans:    Vec<Option<Span>>,
    repeated: Vec<usize>,
    failed:   HashSet<(usize, usize, Vec<Option<Span>>)>,
}

impl MatchState {
    fn new(pattern: &Pattern) -> Self {
        let mut seen = vec![0usize; pattern.names.len()];
        for token in &pattern.tokens {
            if let Token::Capture(i) = token {
                seen[*i] += 1;
            }
        }
        Self {
            spans:    vec![None; pattern.names.len()],
            repeated: (0..seen.len()).filter(|&i| seen[i] > 1).collect(),
            failed:   HashSet::new(),
        }
    }

    fn bindings(&self) -> Vec<Option<Span>> {
        self.repeated.iter().map(|&i| self.spans[i]).collect()
    }
}

fn validate_name(name: &str, pattern: &str) -> Result<(), FisherError> {
    if RESERVED_NAMES.contains(&name) {
        return Err(FisherError::ReservedPlaceholder {
            name:    name.to_string(),
            pattern: pattern.to_string(),
        });
    }
    if name.is_empty() || name.starts_with('_') || name.chars().all(|c| c.is_ascii_digit()) {
        return Err(FisherError::UnnamedPlaceholder {
            name:    name.to_string(),
            pattern: pattern.to_string(),
        });
    }
    let starts_with_digit = name.chars().next().is_some_and(|c| c.is_ascii_digit());
    if starts_with_digit || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(FisherError::InvalidPlaceholder {
            name:    name.to_string(),
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

fn push_glob_literal(glob: &mut String, lit: &str) {
    push_escaped(glob, lit, true);
}

/// Append a criterion value. `*` and `?` stay wildcards; classes, braces and
/// backslashes are matched literally.
fn push_glob_value(glob: &mut String, value: &str) {
    push_escaped(glob, value, false);
}

fn push_escaped(glob: &mut String, text: &str, wildcards: bool) {
    for c in text.chars() {
        let special = match c {
            '[' | ']' | '{' | '}' | '\\' => true,
            '*' | '?' => wildcards,
            _ => false,
        };
        if special {
            glob.push('\\');
        }
        glob.push(c);
    }
}

/// A criterion value as a glob, see [`has_wildcard`].
pub(crate) fn value_glob(value: &str) -> String {
    let mut glob = String::with_capacity(value.len());
    push_glob_value(&mut glob, value);
    glob
}

/// Whether a criterion value is a wildcard rather than an exact value.
pub(crate) fn has_wildcard(value: &str) -> bool {
    value.contains(['*', '?'])
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Pattern {
    type Err = FisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}
