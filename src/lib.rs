/// Test clock that can be frozen to a fixed instant.
pub mod clock;
/// Deep structural comparison and literal-or-regex text matching.
pub mod compare;
/// SQLite row assertions for scenario fixtures.
pub mod db;
/// Error type shared by all assertion helpers.
pub mod error;
/// HTTP response assertions: status, headers, body, redirects.
pub mod http;
/// JSON payload assertions built on the deep comparator.
pub mod json;
/// Tracing capture layer and log assertions.
pub mod logging;
/// Outbound mail capture and assertions.
pub mod mailer;
/// Browser state: last request/response pair and cookies.
pub mod state;
/// Two-column key/value table fixtures.
pub mod table;
