use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::compare::{deep_equals, text_contains};
use crate::error::AssertError;

/// One captured event: the message plus its structured fields.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub fields: Map<String, Value>,
}

/// Layer that records warning and error events for later inspection.
/// Info and debug chatter is dropped at capture time.
pub struct CaptureLayer {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLayer {
    /// The layer plus the handle used to query what it captured.
    pub fn new() -> (Self, TestLogger) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let layer = Self {
            entries: entries.clone(),
        };
        (layer, TestLogger { entries })
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::WARN {
            return;
        }
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let entry = LogEntry {
            level,
            message: visitor.message,
            fields: visitor.fields,
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Map<String, Value>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::Bool(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(rendered));
        }
    }
}

/// Cloneable query handle over the captured log.
#[derive(Debug, Clone)]
pub struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    pub fn all(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn entries(&self, level: Level) -> Vec<LogEntry> {
        self.all()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    pub fn reset(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// `LEVEL: message` listing of everything captured, for failure output.
    pub fn dump(&self) -> String {
        let all = self.all();
        if all.is_empty() {
            return "-no log entries-".to_string();
        }
        all.iter()
            .map(|entry| format!("{}: {}", entry.level, entry.message))
            .collect::<Vec<_>>()
            .join("\n  ")
    }

    /// Find an entry with this exact message whose fields match every
    /// expectation. Field expectations use the `~` regex convention, literal
    /// equality otherwise; an expectation that is itself a JSON container is
    /// compared structurally against the field value.
    pub fn assert_entry(
        &self,
        level: Level,
        message: &str,
        expected_fields: &[(String, String)],
    ) -> Result<(), AssertError> {
        'entries: for entry in self.entries(level) {
            if entry.message != message {
                continue;
            }
            for (key, want) in expected_fields {
                let Some(got) = entry.fields.get(key) else {
                    continue 'entries;
                };
                if !field_matches(got, want)? {
                    continue 'entries;
                }
            }
            return Ok(());
        }
        Err(AssertError::LogEntryNotFound { dump: self.dump() })
    }
}

fn field_matches(got: &Value, want: &str) -> Result<bool, AssertError> {
    let got_text = match got {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if want.starts_with('~') {
        return Ok(text_contains(&got_text, want)?);
    }
    if got_text == want {
        return Ok(true);
    }
    // Structured payloads arrive stringified; when both sides parse as JSON
    // containers, compare them structurally instead.
    let want_value: Value = match serde_json::from_str(want) {
        Ok(value) => value,
        Err(_) => return Ok(false),
    };
    if !(want_value.is_array() || want_value.is_object()) {
        return Ok(false);
    }
    let got_value: Value = match got {
        Value::Array(_) | Value::Object(_) => got.clone(),
        _ => match serde_json::from_str(&got_text) {
            Ok(value) => value,
            Err(_) => return Ok(false),
        },
    };
    Ok(deep_equals(&got_value, &want_value).is_ok())
}

static GLOBAL_CAPTURE: OnceLock<TestLogger> = OnceLock::new();

/// Install the capture layer as the global subscriber and return the shared
/// query handle. Subsequent calls return the same handle, so test harnesses
/// can call this once per scenario and reset between them.
pub fn init_capture() -> TestLogger {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, logger) = CaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            logger
        })
        .clone()
}
