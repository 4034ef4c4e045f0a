//! The structs
//!
use std::sync::{atomic::AtomicBool, Arc};
use async_trait::async_trait;
use anyhow::Result;
use tokio::sync::watch;
use crate::logrecords::LogRecord;

/// The message shown for any failure to read the logs.
/// The cause goes to the log, not to the page.
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to load logs.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error(String),
    Ready,
}

/// The state rendered by the viewer.
///
/// `records` keeps the result of the last successful read while loading or after an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub records: Vec<LogRecord>,
    pub phase: Phase,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            records: Vec::new(),
            phase: Phase::Loading,
        }
    }
}

/// Where the viewer gets its records from.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<LogRecord>>;
}

/// Reads the records from the `/api/logs` endpoint of the log service.
pub struct HttpLogSource {
    pub client: reqwest::Client,
    pub url: String,
}

/// Clones share the state, the source and the initialization flag.
#[derive(Clone)]
pub struct LogViewer {
    pub(crate) source: Arc<dyn LogSource>,
    pub(crate) state: Arc<watch::Sender<ViewState>>,
    pub(crate) initialized: Arc<AtomicBool>,
}
