use thiserror::Error;

use crate::compare::Difference;

/// Errors raised by the assertion helpers.
///
/// A failed comparison inside the deep comparator is a value
/// ([`Difference`]), not an error; this type covers the assertion layer on
/// top of it, genuine misuse (reading state before any request) and
/// malformed input (bad patterns, bad JSON, bad tables).
#[derive(Error, Debug)]
pub enum AssertError {
    #[error("no request was made yet")]
    NoRequest,

    #[error("expected status {expected}, received {actual}")]
    Status { expected: u16, actual: u16 },

    #[error("header not found or not matching. Found\n  {found}")]
    HeaderMismatch { found: String },

    #[error("no redirect code found: Code {0}")]
    NotRedirected(u16),

    #[error("redirected to {actual}, expected {expected}")]
    RedirectMismatch { expected: String, actual: String },

    #[error("text not found in: {haystack}")]
    TextNotFound { haystack: String },

    #[error("text found!")]
    TextFound,

    #[error("only arrays and objects can be matched, got {0}")]
    NotAContainer(&'static str),

    #[error("Got\n{got}\n{difference}")]
    JsonMismatch { got: String, difference: Difference },

    #[error("the json contains exactly this data")]
    JsonContained,

    #[error("mail not found. Did you mean: {dump}")]
    MailNotFound { dump: String },

    #[error("mails found: {dump}")]
    MailFound { dump: String },

    #[error("found recipients: {0}")]
    RecipientNotFound(String),

    #[error("mail was sent from {0}")]
    SenderMismatch(String),

    #[error("no attachment with name {0} found")]
    AttachmentNotFound(String),

    #[error("log entry not found. Did you mean one of:\n  {dump}")]
    LogEntryNotFound { dump: String },

    #[error("not found. Rows in {table}:\n  {rows}")]
    RowNotFound { table: String, rows: String },

    #[error("row found in {0}")]
    RowFound(String),

    #[error("table row must have exactly two cells, got {0}")]
    BadTableRow(usize),

    #[error("duplicate table key {0}")]
    DuplicateTableKey(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}
