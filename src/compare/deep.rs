use std::fmt;

use serde_json::{Map, Value};

/// Where and how two structures first diverged.
///
/// Comparison is fail-fast: the first mismatch found ends the walk, so a
/// `Difference` always describes exactly one offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Dotted locator from the root to the offending node.
    pub path: String,
    pub kind: DifferenceKind,
}

/// The mismatch classes a comparison can end with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifferenceKind {
    /// Two scalars compared unequal.
    Scalar {
        expected_kind: &'static str,
        expected: String,
        actual_kind: &'static str,
        actual: String,
    },
    /// Container on one side, scalar on the other, or array against object.
    Kind {
        expected: &'static str,
        actual: &'static str,
    },
    /// A mapping key is absent from the compared-against structure.
    MissingKey,
    /// No remaining sequence element matched.
    MissingElement { value: String },
    /// An unmatched entry is left over in the second structure (equality only).
    Extra,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DifferenceKind::Scalar {
                expected_kind,
                expected,
                actual_kind,
                actual,
            } => write!(
                f,
                "{}: ({expected_kind}) {expected} != ({actual_kind}) {actual}",
                self.path
            ),
            DifferenceKind::Kind { expected, actual } => {
                write!(f, "{}: <{expected}> != <{actual}>", self.path)
            }
            DifferenceKind::MissingKey => write!(f, "{}: Missing", self.path),
            DifferenceKind::MissingElement { value } => {
                write!(f, "{}: {value} Missing", self.path)
            }
            DifferenceKind::Extra => write!(f, "{}: Extra", self.path),
        }
    }
}

/// Compare two JSON values for deep equality.
///
/// Mapping keys must match exactly in both directions. Sequences match as
/// multisets: element order is irrelevant, multiplicities are not. On
/// mismatch the first difference found is returned; siblings after it are
/// never visited.
pub fn deep_equals(a: &Value, b: &Value) -> Result<(), Difference> {
    match diff(a, b, "", true) {
        Some(difference) => Err(difference),
        None => Ok(()),
    }
}

/// One-way containment: every key and element of `containment` must have a
/// matching counterpart in `container`, while extra entries in `container`
/// are ignored.
pub fn deep_contains(container: &Value, containment: &Value) -> Result<(), Difference> {
    match diff(containment, container, "", false) {
        Some(difference) => Err(difference),
        None => Ok(()),
    }
}

/// JSON kind name of a value, as used in difference messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_f64() {
                "float"
            } else {
                "integer"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Recursive first-difference search. `reverse_check` flags leftover entries
/// in `b` as extra; containment runs with it disabled.
fn diff(a: &Value, b: &Value, path: &str, reverse_check: bool) -> Option<Difference> {
    let a_is_container = a.is_array() || a.is_object();
    let b_is_container = b.is_array() || b.is_object();

    if !a_is_container && !b_is_container {
        if a != b {
            return Some(Difference {
                path: path.to_string(),
                kind: DifferenceKind::Scalar {
                    expected_kind: value_kind(a),
                    expected: render(a),
                    actual_kind: value_kind(b),
                    actual: render(b),
                },
            });
        }
        return None;
    }

    match (a, b) {
        (Value::Array(av), Value::Array(bv)) => diff_sequence(av, bv, path, reverse_check),
        (Value::Object(am), Value::Object(bm)) => diff_mapping(am, bm, path, reverse_check),
        _ => Some(Difference {
            path: path.to_string(),
            kind: DifferenceKind::Kind {
                expected: value_kind(a),
                actual: value_kind(b),
            },
        }),
    }
}

fn diff_mapping(
    a: &Map<String, Value>,
    b: &Map<String, Value>,
    path: &str,
    reverse_check: bool,
) -> Option<Difference> {
    // Matched keys are removed from a working copy so they cannot match
    // twice and so leftovers are visible to the reverse check.
    let mut rest = b.clone();
    for (key, value) in a {
        let subpath = join_path(path, key);
        match rest.get(key) {
            None => {
                return Some(Difference {
                    path: subpath,
                    kind: DifferenceKind::MissingKey,
                });
            }
            Some(found) => {
                if let Some(difference) = diff(value, found, &subpath, reverse_check) {
                    return Some(difference);
                }
            }
        }
        rest.remove(key);
    }
    if reverse_check {
        if let Some(key) = rest.keys().next_back() {
            return Some(Difference {
                path: join_path(path, key),
                kind: DifferenceKind::Extra,
            });
        }
    }
    None
}

fn diff_sequence(a: &[Value], b: &[Value], path: &str, reverse_check: bool) -> Option<Difference> {
    // First-fit multiset matching: each element of `a` consumes the first
    // remaining element of `b` it matches, without backtracking.
    let mut rest = b.to_vec();
    for (index, value) in a.iter().enumerate() {
        let subpath = join_path(path, &index.to_string());
        let found = rest
            .iter()
            .position(|candidate| diff(value, candidate, &subpath, reverse_check).is_none());
        match found {
            Some(matched) => {
                rest.remove(matched);
            }
            None => {
                return Some(Difference {
                    path: subpath,
                    kind: DifferenceKind::MissingElement {
                        value: render(value),
                    },
                });
            }
        }
    }
    if reverse_check {
        if let Some(leftover) = rest.last() {
            return Some(Difference {
                path: join_path(path, &render(leftover)),
                kind: DifferenceKind::Extra,
            });
        }
    }
    None
}

fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

/// Scalars render bare (strings unquoted), containers as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
