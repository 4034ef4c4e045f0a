//! The structs
//!
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// The identifier of a log record.
///
/// The log service sends a number for most backends, but some send the id as a string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum LogId {
    Number(i64),
    Text(String),
}

impl Default for LogId {
    fn default() -> Self {
        LogId::Text(String::new())
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogId::Number(number) => write!(f, "{}", number),
            LogId::Text(text) => write!(f, "{}", text),
        }
    }
}

/// One API call event as returned by the log service.
///
/// Fields that are missing or `null` in the json take their default, fields that are not listed here are ignored.
/// A field of an unexpected json type does not reject the record: it is taken as its json text,
/// a status that is not a number (or a numeric string) is taken as absent.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LogRecord {
    #[serde(deserialize_with = "lenient_log_id")]
    pub log_id: LogId,
    #[serde(deserialize_with = "lenient_string")]
    pub service_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub api_endpoint: String,
    #[serde(deserialize_with = "lenient_string")]
    pub http_method: String,
    #[serde(deserialize_with = "lenient_status")]
    pub response_status: Option<i64>,
    /// The time of the event, as sent by the service. Parsing happens at display time.
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient_string")]
    pub client_ip: String,
    #[serde(deserialize_with = "lenient_payload")]
    pub request_payload: Option<String>,
    #[serde(deserialize_with = "lenient_payload")]
    pub response_payload: Option<String>,
}

/// Wrapper for the records of one read of `/api/logs`.
#[derive(Debug, Default)]
pub struct AllLogRecords {
    pub logrecords: Vec<LogRecord>,
}

/// Presentational classification of a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTier {
    ServerError,
    ClientError,
    Redirect,
    Success,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_payload(deserializer)?.unwrap_or_default())
}

fn lenient_payload<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_log_id<'de, D>(deserializer: D) -> Result<LogId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => LogId::default(),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => LogId::Number(integer),
            None => LogId::Text(number.to_string()),
        },
        Value::String(text) => LogId::Text(text),
        other => LogId::Text(other.to_string()),
    })
}

// "200" is accepted as 200, a float is truncated.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}
