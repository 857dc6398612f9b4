use cucumber::gherkin::Step;
use cucumber::then;
use tracing::Level;

use crate::StagehandWorld;

fn parse_level(raw: &str) -> Level {
    match raw.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warning" | "warn" => Level::WARN,
        other => panic!("unsupported log level {other:?}, use error or warning"),
    }
}

/// `the log contains an error entry "..."` with an optional table of field
/// expectations (literal, `~` regex, or JSON documents compared
/// structurally).
#[then(expr = "the log contains a/an {word} entry {string}")]
async fn the_log_contains_an_entry(
    world: &mut StagehandWorld,
    level: String,
    message: String,
    step: &Step,
) {
    let logger = world
        .logger
        .as_ref()
        .expect("log capture not installed — add 'Given the demo application is running'");
    let expected_fields = match step.table.as_ref() {
        Some(table) => stagehand::table::rows_hash(&table.rows).unwrap_or_else(|e| panic!("{e}")),
        None => Vec::new(),
    };
    logger
        .assert_entry(parse_level(&level), &message, &expected_fields)
        .unwrap_or_else(|e| panic!("{e}"));
}
