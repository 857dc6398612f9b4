use serde_json::Value;

use crate::compare::{Difference, deep_contains, deep_equals, value_kind};
use crate::error::AssertError;

/// Assert full structural equality between a JSON body and an expected JSON
/// document. Array element order is not significant.
pub fn assert_json_matches(body: &str, expected: &str) -> Result<(), AssertError> {
    let expected = parse_container(expected)?;
    let got = parse_container(body)?;
    if let Err(difference) = deep_equals(&expected, &got) {
        return Err(mismatch(&got, difference));
    }
    Ok(())
}

/// Assert the body contains the expected document: every expected key and
/// element must be present, extra data in the body is ignored.
pub fn assert_json_contains(body: &str, expected: &str) -> Result<(), AssertError> {
    let expected = parse_container(expected)?;
    let got = parse_container(body)?;
    if let Err(difference) = deep_contains(&got, &expected) {
        return Err(mismatch(&got, difference));
    }
    Ok(())
}

/// Inverse of [`assert_json_contains`]. A body that is not valid JSON at all
/// trivially contains nothing, so it passes.
pub fn assert_json_not_contains(body: &str, expected: &str) -> Result<(), AssertError> {
    match assert_json_contains(body, expected) {
        Ok(()) => Err(AssertError::JsonContained),
        Err(_) => Ok(()),
    }
}

/// Only containers can be matched; a scalar root is a usage error.
fn parse_container(raw: &str) -> Result<Value, AssertError> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_array() || value.is_object() {
        Ok(value)
    } else {
        Err(AssertError::NotAContainer(value_kind(&value)))
    }
}

fn mismatch(got: &Value, difference: Difference) -> AssertError {
    let pretty = serde_json::to_string_pretty(got).unwrap_or_else(|_| got.to_string());
    AssertError::JsonMismatch {
        got: pretty,
        difference,
    }
}
