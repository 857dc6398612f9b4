use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AssertError;

/// A request as the application under test received it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A response as the application under test produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ResponseRecord {
    /// All values of a header, matched by case-insensitive name.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// The last request/response pair of the running scenario, plus every cookie
/// the application has set so far.
///
/// One instance per scenario; accessing it before any exchange was recorded
/// is a usage error, not a normal failure.
#[derive(Debug, Default)]
pub struct BrowserState {
    request: Option<RequestRecord>,
    response: Option<ResponseRecord>,
    cookies: BTreeMap<String, String>,
}

impl BrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest exchange. Cookies from `Set-Cookie` headers
    /// accumulate across requests until [`reset`](Self::reset).
    pub fn record(&mut self, request: RequestRecord, response: ResponseRecord) {
        for value in response.header_values("set-cookie") {
            if let Some((name, rest)) = value.split_once('=') {
                let value = rest.split(';').next().unwrap_or(rest);
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        self.request = Some(request);
        self.response = Some(response);
    }

    pub fn request(&self) -> Result<&RequestRecord, AssertError> {
        self.request.as_ref().ok_or(AssertError::NoRequest)
    }

    pub fn response(&self) -> Result<&ResponseRecord, AssertError> {
        self.response.as_ref().ok_or(AssertError::NoRequest)
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    pub fn reset(&mut self) {
        self.request = None;
        self.response = None;
        self.cookies.clear();
    }
}
