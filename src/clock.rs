use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// Clock that can be frozen to a fixed instant for a scenario.
///
/// Cloneable; clones share the frozen state, so the handle held by a test
/// and the one handed to the application under test stay in sync.
#[derive(Debug, Clone, Default)]
pub struct TestClock {
    frozen: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin [`now`](Self::now) to the given instant until
    /// [`reset`](Self::reset).
    pub fn freeze(&self, instant: DateTime<Utc>) {
        if let Ok(mut frozen) = self.frozen.lock() {
            *frozen = Some(instant);
        }
    }

    pub fn reset(&self) {
        if let Ok(mut frozen) = self.frozen.lock() {
            *frozen = None;
        }
    }

    /// The frozen instant, or the real current time when not frozen.
    pub fn now(&self) -> DateTime<Utc> {
        self.frozen
            .lock()
            .ok()
            .and_then(|frozen| *frozen)
            .unwrap_or_else(Utc::now)
    }
}
