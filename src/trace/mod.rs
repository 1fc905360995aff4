//! Structured trace records for external observability tools.
//!
//! A [`Tracer`] is a pure sink: the machine hands it a record at creation,
//! when an event is received, on every internal transition, and when the
//! event has either settled or failed and been rolled back. Nothing a tracer
//! does feeds back into dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Receiver of trace records.
pub trait Tracer: Send + Sync {
    fn trace(&self, record: &TraceRecord);
}

/// One trace record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub machine_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: TraceKind,
}

impl TraceRecord {
    pub fn now(machine_id: Uuid, kind: TraceKind) -> Self {
        Self {
            machine_id,
            timestamp: Utc::now(),
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceKind {
    MachineCreated {
        states: usize,
        transitions: usize,
    },
    EventReceived {
        event: String,
        state: String,
    },
    InternalTransition {
        from: String,
        event: String,
        /// State whose handler matched: the origin itself or an ancestor.
        handler: String,
        guard: Option<String>,
        action: String,
        to: String,
        depth: usize,
    },
    EventSettled {
        event: String,
        state: String,
        transitioned: bool,
    },
    /// The dispatch failed; `state` is the control state it was rolled back to.
    /// Internal transitions traced since the matching `EventReceived` were undone.
    EventFailed {
        event: String,
        state: String,
        error: String,
    },
}

/// Tracer that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    records: Mutex<Vec<TraceRecord>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far.
    pub fn records(&self) -> Vec<TraceRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Targets of the internal transitions received so far, in order.
    pub fn visited(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|record| match record.kind {
                TraceKind::InternalTransition { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }
}

impl Tracer for RecordingTracer {
    fn trace(&self, record: &TraceRecord) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push(record.clone());
    }
}
