//! Analysis Event Logger
//!
//! One structured record per step of an analysis attempt, emitted on the
//! `analysis_events` tracing target.

use chrono::{DateTime, Utc};
use mathtutor_core::ErrorKind;
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    Started {
        model: String,
        image_name: String,
        image_bytes: usize,
    },
    Succeeded {
        latency_ms: u64,
        unrecognized: bool,
    },
    Failed {
        kind: ErrorKind,
        error_msg: String,
    },
    Cancelled,
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub attempt: u64,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Builds the entry, redacting free-form text.
    pub fn entry(attempt: u64, mut event: AnalysisEvent) -> EventLogEntry {
        if let AnalysisEvent::Failed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        EventLogEntry {
            attempt,
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(attempt: u64, event: AnalysisEvent) {
        let entry = Self::entry(attempt, event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "analysis_events", event = %json, "Analysis event"),
            Err(_) => info!(target: "analysis_events", event = ?entry, "Analysis event"),
        }
    }
}
