//! Audit trail contract.
//!
//! Every sensitive account mutation attempts to record an [`AuditEvent`]
//! through an [`AuditSink`]. Recording is fire-and-forget: a sink failure is
//! logged and never fails the triggering operation.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome recorded with an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Success,
    Denied,
    Failure,
}

/// Sensitivity of the audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// One audit record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub actor_id: Option<Uuid>,
    /// Role tag of the actor, e.g. `super_admin`.
    pub actor_type: String,
    /// Machine-readable action name, e.g. `account.deactivate`.
    pub action: String,
    pub category: String,
    pub description: String,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub status: AuditStatus,
    pub risk_level: RiskLevel,
    /// State snapshot before the mutation, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    /// State snapshot after the mutation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// Destination for audit events.
///
/// `record` must not panic and must not block the caller on failure; sinks
/// that can fail log locally instead of propagating.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Sink that emits events to the `audit` tracing target as structured JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => {
                tracing::info!(target: "audit", event = %json, "audit event");
            }
            Err(e) => {
                // Losing an audit record must not fail the operation.
                tracing::warn!(target: "audit", error = %e, "failed to serialize audit event");
            }
        }
    }
}

/// In-memory sink for tests and local inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit sink poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("audit sink poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().expect("audit sink poisoned").push(event);
    }
}
