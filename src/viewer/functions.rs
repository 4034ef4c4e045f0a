//! The impls and functions.
//!
use std::{sync::{atomic::{AtomicBool, Ordering}, Arc}, time::Instant};
use async_trait::async_trait;
use colored::*;
use log::*;
use anyhow::Result;
use tokio::sync::watch;
use unicode_width::UnicodeWidthStr;
use crate::logrecords::{AllLogRecords, LogRecord};
use crate::payload::payload_cell;
use crate::viewer::{HttpLogSource, LogSource, LogViewer, Phase, ViewState, FETCH_FAILURE_MESSAGE};

pub const TITLE: &str = "API Event Logs";
pub const COLUMNS: [&str; 9] = ["ID", "Service", "Endpoint", "Method", "Status", "Timestamp", "Client IP", "Request", "Response"];
pub const LOADING_MESSAGE: &str = "Loading logs...";
const STATUS_COLUMN: usize = 4;
// the status dot and the space after it
const STATUS_DECORATION_WIDTH: usize = 2;
const COLUMN_SEPARATOR: &str = "  ";

impl HttpLogSource {
    pub fn new(
        client: reqwest::Client,
        url: String,
    ) -> Self
    {
        HttpLogSource { client, url }
    }
}

#[async_trait]
impl LogSource for HttpLogSource {
    async fn fetch(&self) -> Result<Vec<LogRecord>> {
        let alllogrecords = AllLogRecords::read_logrecords(&self.client, &self.url).await?;
        Ok(alllogrecords.logrecords)
    }
}

impl LogViewer {
    pub fn new(
        source: Arc<dyn LogSource>,
    ) -> Self
    {
        let (state, _) = watch::channel(ViewState::default());
        LogViewer {
            source,
            state: Arc::new(state),
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }
    /// Perform the first load. Only the first call of all clones of a viewer loads,
    /// later calls return immediately.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("viewer already initialized");
            return;
        }
        self.load().await;
    }
    /// Read the records from the source and set the state to the outcome.
    ///
    /// The state is set to loading first. On success the records are replaced and the state is ready,
    /// on failure the records are kept and the state is error with [`FETCH_FAILURE_MESSAGE`].
    /// In-flight loads are not cancelled: the load that finishes last sets the state.
    pub async fn load(&self) {
        info!("begin load");
        let timer = Instant::now();

        self.state.send_modify(|state| state.phase = Phase::Loading);

        match self.source.fetch().await {
            Ok(records) => {
                debug!("loaded {} records", records.len());
                self.state.send_modify(move |state| {
                    state.records = records;
                    state.phase = Phase::Ready;
                });
            },
            Err(error) => {
                error!("Error loading logs: {:#}", error);
                self.state.send_modify(|state| state.phase = Phase::Error(FETCH_FAILURE_MESSAGE.to_string()));
            },
        }

        info!("end load: {:?}", timer.elapsed());
    }
    pub async fn refresh(&self) {
        self.load().await;
    }
    /// A receiver that is notified of every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }
    pub fn render(&self) -> String {
        render(&self.state.borrow())
    }
    pub fn print(&self) {
        println!("{}", self.render());
    }
}

/// Render the page for a state: a loading line, an error line, or the heading with the table.
pub fn render(
    state: &ViewState,
) -> String
{
    match &state.phase {
        Phase::Loading => LOADING_MESSAGE.to_string(),
        Phase::Error(message) => format!("{} {}", "Error:".red(), message.red()),
        Phase::Ready => format!("{}\n\n{}", render_heading(), render_table(&state.records)),
    }
}

// The search field is not functional.
fn render_heading() -> String {
    format!("{}    [Search...]    [enter] Update list  [q] Quit", TITLE.bold())
}

/// The nine cells of a table row, in column order.
/// Control characters other than newline are escaped, the text comes from the log service and its clients.
pub fn row_cells(
    record: &LogRecord,
) -> [String; 9]
{
    [
        record.log_id.to_string(),
        record.service_name.clone(),
        record.api_endpoint.clone(),
        record.http_method.clone(),
        record.response_status.map(|status| status.to_string()).unwrap_or_default(),
        record.display_timestamp(),
        record.client_ip.clone(),
        payload_cell(record.request_payload.as_deref()),
        payload_cell(record.response_payload.as_deref()),
    ]
    .map(|cell| escape_control_chars(&cell))
}

fn escape_control_chars(
    text: &str,
) -> String
{
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_control() && character != '\n' {
            escaped.extend(character.escape_default());
        } else {
            escaped.push(character);
        }
    }
    escaped
}

// Pad to `width` terminal columns; wide characters take two.
fn pad(
    text: &str,
    width: usize,
) -> String
{
    format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
}

/// Render the header and one row per record. A row with multi-line cells takes as many lines as its highest cell,
/// columns are as wide as their widest line in terminal columns.
pub fn render_table(
    records: &[LogRecord],
) -> String
{
    let rows: Vec<[String; 9]> = records.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|name| name.width()).collect();
    for row in &rows {
        for (column, cell) in row.iter().enumerate() {
            let decoration = if column == STATUS_COLUMN { STATUS_DECORATION_WIDTH } else { 0 };
            let cell_width = cell.lines().map(|line| line.width()).max().unwrap_or(0) + decoration;
            widths[column] = widths[column].max(cell_width);
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let header = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(name, width)| pad(name, *width))
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR);
    lines.push(header.trim_end().bold().to_string());

    for (record, row) in records.iter().zip(&rows) {
        let height = row.iter().map(|cell| cell.lines().count().max(1)).max().unwrap_or(1);
        for line_number in 0..height {
            let mut columns: Vec<String> = Vec::with_capacity(COLUMNS.len());
            for (column, cell) in row.iter().enumerate() {
                let text = cell.lines().nth(line_number).unwrap_or("");
                if column == STATUS_COLUMN && line_number == 0 {
                    columns.push(format!("{} {}", record.status_tier().dot(), pad(text, widths[column] - STATUS_DECORATION_WIDTH)));
                } else {
                    columns.push(pad(text, widths[column]));
                }
            }
            lines.push(columns.join(COLUMN_SEPARATOR).trim_end().to_string());
        }
    }
    lines.join("\n")
}
