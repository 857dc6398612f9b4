use regex::Regex;

/// How an expected string is interpreted: verbatim, or as a regular
/// expression when written with a leading `~`.
///
/// A literal that itself starts with `~` cannot be expressed; there is no
/// escape mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSpec {
    Literal(String),
    Regex(String),
}

impl MatchSpec {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('~') {
            Some(pattern) => MatchSpec::Regex(pattern.to_string()),
            None => MatchSpec::Literal(raw.to_string()),
        }
    }
}

/// True when `haystack` contains `needle` as a substring, or matches the
/// pattern anywhere for `~` specs.
pub fn text_contains(haystack: &str, needle: &str) -> Result<bool, regex::Error> {
    match MatchSpec::parse(needle) {
        MatchSpec::Literal(literal) => Ok(haystack.contains(&literal)),
        MatchSpec::Regex(pattern) => Ok(Regex::new(&pattern)?.is_match(haystack)),
    }
}

/// True when `actual` equals `expected` verbatim, or matches the pattern for
/// `~` specs. Patterns are anchored on both ends unless already written so,
/// forcing a full-string match.
pub fn text_equals(actual: &str, expected: &str) -> Result<bool, regex::Error> {
    match MatchSpec::parse(expected) {
        MatchSpec::Literal(literal) => Ok(actual == literal),
        MatchSpec::Regex(mut pattern) => {
            if !pattern.starts_with('^') {
                pattern.insert(0, '^');
            }
            if !pattern.ends_with('$') {
                pattern.push('$');
            }
            Ok(Regex::new(&pattern)?.is_match(actual))
        }
    }
}
