//! Module for reading `/api/logs` on the log collection service.
//!
//! The `/api/logs` endpoint returns a json array with one object per recorded API call.
//! The records are taken as they are returned: the order of the array is the display order,
//! and a record is never changed after it has been read.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
