//! The impls and functions.
//!
use std::time::Instant;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use colored::*;
use log::*;
use anyhow::{Context, Result};
use crate::utility;
use crate::logrecords::{AllLogRecords, LogRecord, StatusTier};

/// The zone-less formats the log service is known to send, interpreted as local time.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl AllLogRecords {
    pub async fn read_logrecords(
        client: &reqwest::Client,
        url: &str,
    ) -> Result<AllLogRecords>
    {
        info!("begin http read");
        let timer = Instant::now();

        let data_from_http = utility::http_get(client, url).await?;
        let logrecords = AllLogRecords::parse_logrecords(&data_from_http)
            .with_context(|| format!("Invalid log records from {}", url))?;

        info!("end http read {:?}, {} records", timer.elapsed(), logrecords.len());

        Ok(AllLogRecords { logrecords })
    }
    /// The body must be a json array, anything else is an error.
    pub fn parse_logrecords(
        http_data: &str,
    ) -> Result<Vec<LogRecord>>
    {
        serde_json::from_str(http_data)
            .with_context(|| "could not parse /api/logs json data")
    }
    pub fn print_json(
        &self,
    ) -> Result<()>
    {
        println!("{}", serde_json::to_string_pretty(&self.logrecords)?);
        Ok(())
    }
}

impl LogRecord {
    /// The tier of the response status. A record without a status is displayed as success.
    pub fn status_tier(&self) -> StatusTier {
        self.response_status
            .map(StatusTier::from_status)
            .unwrap_or(StatusTier::Success)
    }
    pub fn local_timestamp(&self) -> Option<DateTime<Local>> {
        parse_timestamp(&self.created_at)
    }
    /// The event time in the local timezone, or the text as sent when it cannot be parsed.
    pub fn display_timestamp(&self) -> String {
        match self.local_timestamp() {
            Some(timestamp) => timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
            None => self.created_at.clone(),
        }
    }
}

impl StatusTier {
    pub fn from_status(status: i64) -> Self {
        match status {
            s if s >= 500 => StatusTier::ServerError,
            s if s >= 400 => StatusTier::ClientError,
            s if s >= 300 => StatusTier::Redirect,
            _ => StatusTier::Success,
        }
    }
    /// The status marker shown in front of the status code.
    pub fn dot(&self) -> ColoredString {
        match self {
            StatusTier::ServerError => "●".red(),
            StatusTier::ClientError => "●".yellow(),
            StatusTier::Redirect => "●".blue(),
            StatusTier::Success => "●".green(),
        }
    }
}

pub fn parse_timestamp(
    raw: &str,
) -> Option<DateTime<Local>>
{
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Local));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}
