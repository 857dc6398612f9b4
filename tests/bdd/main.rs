mod app;
mod steps;

use std::path::PathBuf;

use cucumber::World;
use rusqlite::Connection;

use stagehand::clock::TestClock;
use stagehand::logging::TestLogger;
use stagehand::mailer::{Email, TestTransport};
use stagehand::state::BrowserState;

/// Shared state carried through each scenario.
#[derive(Debug, World)]
pub struct StagehandWorld {
    /// Port of the in-process demo server, once started.
    pub server_port: Option<u16>,
    /// Handle of the demo server task, aborted when the scenario ends.
    pub server_handle: Option<tokio::task::JoinHandle<()>>,
    /// Client with redirects disabled so redirect responses stay observable.
    pub http_client: reqwest::Client,
    /// Last request/response pair plus accumulated cookies.
    pub state: BrowserState,
    /// Mail sink handed to the demo application.
    pub transport: TestTransport,
    /// Capture handle for the global tracing subscriber.
    pub logger: Option<TestLogger>,
    /// Clock handed to the demo application.
    pub clock: TestClock,
    /// Temporary directory that owns the scenario database file.
    pub db_dir: Option<tempfile::TempDir>,
    /// Path to the SQLite database file inside `db_dir`.
    pub db_path: Option<PathBuf>,
    /// Mail most recently identified by recipient and subject.
    pub last_mail: Option<Email>,
}

impl Default for StagehandWorld {
    fn default() -> Self {
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build http client");
        StagehandWorld {
            server_port: None,
            server_handle: None,
            http_client,
            state: BrowserState::new(),
            transport: TestTransport::new(),
            logger: None,
            clock: TestClock::new(),
            db_dir: None,
            db_path: None,
            last_mail: None,
        }
    }
}

impl Drop for StagehandWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
    }
}

impl StagehandWorld {
    /// Open the scenario database. Panics with a hint when no database step
    /// ran yet.
    pub fn open_db(&self) -> Connection {
        let path = self
            .db_path
            .as_ref()
            .expect("database not initialized — add 'Given an empty orders database'");
        Connection::open(path).expect("failed to open scenario database")
    }
}

#[tokio::main]
async fn main() {
    // The tracing subscriber and its capture storage are process-global, so
    // scenarios must not interleave.
    StagehandWorld::cucumber()
        .max_concurrent_scenarios(1)
        .run_and_exit("tests/features")
        .await;
}
