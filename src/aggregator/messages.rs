//! Human-readable log messages for ingested events

use crate::types::{EventKind, Status};

/// Derive the log message for a `(kind, status)` pair
///
/// Port events and unknown kinds or statuses yield an empty message. Port
/// events still change the state, they just have no log line of their own.
pub fn derive_message(kind: EventKind, status: Status, artifact: &str) -> String {
    match (kind, status) {
        (EventKind::Build, Status::InProgress) => format!("Build started for artifact {}", artifact),
        (EventKind::Build, Status::Complete) => format!("Build completed for artifact {}", artifact),
        (EventKind::Build, Status::Failed) => format!("Build failed for artifact {}", artifact),
        (EventKind::Deploy, Status::InProgress) => "Deploy started".to_string(),
        (EventKind::Deploy, Status::Complete) => "Deploy complete".to_string(),
        (EventKind::Deploy, Status::Failed) => "Deploy failed".to_string(),
        _ => String::new(),
    }
}
