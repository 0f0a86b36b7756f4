//! Display model implementations for table and JSON output

mod diagnostic;
mod network;
mod org;

pub use diagnostic::DiagnosticDisplay;
pub use network::NetworkDisplay;
pub use org::OrgDisplay;
