//! Display models for CLI output
//!
//! Display models convert dashboard and run types into table rows and JSON
//! records.

pub mod display;

pub use display::{DiagnosticDisplay, NetworkDisplay, OrgDisplay};
