use crate::compare::{text_contains, text_equals};
use crate::error::AssertError;
use crate::state::ResponseRecord;

const REDIRECT_CODES: &[u16] = &[301, 302, 303, 307, 308];

pub fn assert_status(response: &ResponseRecord, expected: u16) -> Result<(), AssertError> {
    if response.status != expected {
        return Err(AssertError::Status {
            expected,
            actual: response.status,
        });
    }
    Ok(())
}

/// Check that some value of the named header matches the expectation, which
/// may be a `~` regex spec. On failure the error lists every header present.
pub fn assert_header(
    response: &ResponseRecord,
    name: &str,
    expected: &str,
) -> Result<(), AssertError> {
    for value in response.header_values(name) {
        if text_equals(value, expected)? {
            return Ok(());
        }
    }
    let found = response
        .headers
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n  ");
    Err(AssertError::HeaderMismatch { found })
}

pub fn assert_body_contains(response: &ResponseRecord, spec: &str) -> Result<(), AssertError> {
    if text_contains(&response.body, spec)? {
        return Ok(());
    }
    Err(AssertError::TextNotFound {
        haystack: response.body.clone(),
    })
}

pub fn assert_body_not_contains(response: &ResponseRecord, spec: &str) -> Result<(), AssertError> {
    if text_contains(&response.body, spec)? {
        return Err(AssertError::TextFound);
    }
    Ok(())
}

/// The `Location` target of a redirect response. Requires a 3xx status code
/// and a `Location` header.
pub fn redirect_target(response: &ResponseRecord) -> Result<String, AssertError> {
    if !REDIRECT_CODES.contains(&response.status) {
        return Err(AssertError::NotRedirected(response.status));
    }
    match response.header_values("location").first() {
        Some(value) => Ok((*value).to_string()),
        None => Err(AssertError::NotRedirected(response.status)),
    }
}

/// Check the redirect target. An expectation starting with `/` is compared
/// against the path portion of the `Location` value only, so absolute
/// targets still match path expectations.
pub fn assert_redirect(response: &ResponseRecord, expected: &str) -> Result<(), AssertError> {
    let target = redirect_target(response)?;
    let compared = if expected.starts_with('/') {
        url_path(&target)
    } else {
        target.clone()
    };
    if text_equals(&compared, expected)? {
        return Ok(());
    }
    Err(AssertError::RedirectMismatch {
        expected: expected.to_string(),
        actual: target,
    })
}

/// Path portion of an absolute or relative URL, query and fragment stripped.
fn url_path(url: &str) -> String {
    let after_host = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(path_start) => &rest[path_start..],
                None => "/",
            }
        }
        None => url,
    };
    let end = after_host
        .find(['?', '#'])
        .unwrap_or(after_host.len());
    after_host[..end].to_string()
}
