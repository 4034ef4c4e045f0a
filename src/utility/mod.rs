//! Module for the http, option and .env handling shared by the viewer and the binary.
mod utility;

pub use utility::*;
