//! Observer events emitted while a facade is being created.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::provider::{Availability, BackendKind};

/// Notable steps of backend resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelEvent {
    /// The local host answered the availability query.
    LocalProbed { availability: Availability },
    /// Probing or creating the local backend failed; remote is used instead.
    LocalProbeFailed { reason: String },
    /// A facade is ready and bound to this backend.
    BackendSelected { kind: BackendKind },
}

/// Callback receiving [`ModelEvent`]s.
pub type EventSink = Arc<dyn Fn(ModelEvent) + Send + Sync>;

pub(crate) fn emit(sink: Option<&EventSink>, event: ModelEvent) {
    if let Some(sink) = sink {
        sink(event);
    }
}
