//! api_logviewer reads the API event logs from the `/api/logs` endpoint of a log collection service,
//! and shows them as a table in the terminal.
//!
//! - [`logrecords`]: the records as sent by the service, and reading them over http.
//! - [`payload`]: formatting of the request and response payloads.
//! - [`viewer`]: the view state, the load and refresh cycle, and rendering of the page.
//! - [`utility`]: http, option and .env handling.
//!
#[macro_use]
extern crate serde_derive;

pub mod logrecords;
pub mod payload;
pub mod utility;
pub mod viewer;
