//! Structured logging for mathtutor.
//!
//! Subscriber setup (console and rolling JSON file), secret redaction, and
//! per-attempt analysis events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, EventLogEntry, EventLogger};
pub use logger::{init_logger, LogOptions};
pub use redact::redact_sensitive_data;
