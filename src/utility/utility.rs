//! Utilities
use log::*;
use std::{env, fs, io::Write, collections::HashMap, time::Duration};
use anyhow::{bail, Context, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: &str = "8083";
pub const DEFAULT_TIMEOUT: &str = "10";
pub const LOGS_PATH: &str = "api/logs";

pub fn build_client(
    timeout: Duration,
    accept_invalid_certs: bool,
) -> Result<reqwest::Client>
{
    reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .with_context(|| "Error building http client")
}

/// Perform a GET on `url` and return the body.
/// A response with a non success status is an error.
pub async fn http_get(
    client: &reqwest::Client,
    url: &str,
) -> Result<String>
{
    let data_from_web_request = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Error requesting {}", url))?;

    if !data_from_web_request.status().is_success()
    {
        debug!("Non success response: {} = {}", url, data_from_web_request.status());
        bail!("Non success response: {} = {}", url, data_from_web_request.status());
    }
    debug!("Success response: {} = {}", url, data_from_web_request.status());

    data_from_web_request
        .text()
        .await
        .with_context(|| format!("Error reading response body from {}", url))
}

/// Resolve an option: the switch if it is set, otherwise the environment variable
/// (possibly set via .env), otherwise the default.
/// A switch or environment value is recorded in `changed_options` so it can be written to .env.
pub fn set_option(
    option: &Option<String>,
    variable: &'static str,
    default: &str,
    changed_options: &mut HashMap<&'static str, String>,
) -> String
{
    match option {
        Some(value) => {
            info!("{} argument set: using: {}", variable, value);
            changed_options.insert(variable, value.to_string());
            value.to_string()
        },
        None => {
            match env::var(variable) {
                Ok(set_var) => {
                    info!("{} not set: set via .env: {}", variable, set_var);
                    changed_options.insert(variable, set_var.to_owned());
                    set_var
                }
                Err(_e) => {
                    info!("{} not set: and not set via .env: using default: {}", variable, default);
                    default.to_string()
                }
            }
        },
    }
}

/// The url of the log collection: `--url` or LOGVIEWER_URL as is,
/// otherwise assembled from host and port.
pub fn set_url(
    url: &Option<String>,
    host: &Option<String>,
    port: &Option<String>,
    changed_options: &mut HashMap<&'static str, String>,
) -> String
{
    if url.is_some() || env::var("LOGVIEWER_URL").is_ok() {
        return set_option(url, "LOGVIEWER_URL", "", changed_options);
    }
    let host = set_option(host, "LOGVIEWER_HOST", DEFAULT_HOST, changed_options);
    let port = set_option(port, "LOGVIEWER_PORT", DEFAULT_PORT, changed_options);
    logs_url(&host, &port)
}

pub fn logs_url(
    host: &str,
    port: &str,
) -> String
{
    format!("http://{}:{}/{}", host, port, LOGS_PATH)
}

pub fn set_timeout(
    timeout: &Option<String>,
    changed_options: &mut HashMap<&'static str, String>,
) -> Result<Duration>
{
    let timeout_string = set_option(timeout, "LOGVIEWER_TIMEOUT", DEFAULT_TIMEOUT, changed_options);
    let seconds: u64 = timeout_string
        .parse()
        .with_context(|| format!("Invalid timeout: {}", timeout_string))?;
    Ok(Duration::from_secs(seconds))
}

pub fn dotenv_writer(
    write_dotenv: bool,
    changed_options: HashMap<&str, String>,
) -> Result<()>
{
    if !changed_options.is_empty() && write_dotenv {
        info!("Writing .env file");
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(".env")
            .with_context(|| "Error writing .env file: .env")?;

        for (key, value) in changed_options {
            file.write_all(format!("{}={}\n", key, value).as_bytes())?;
            info!("{}={}", key, value);
        }
    }
    Ok(())
}
