//! The log viewer.
//!
//! The viewer owns the view state: the records of the latest successful read, and the phase of the
//! read cycle (loading, error or ready). It reads the records via a [`LogSource`], and renders the
//! state as a page of text.
//!
//! Every state change is published to subscribers, so a host can redraw the page whenever the
//! state changes. Reads may overlap: the read that finishes last determines the state.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
