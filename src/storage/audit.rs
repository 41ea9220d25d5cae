// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for security-sensitive operations.
//!
//! Signup and login milestones, catalog mutations, and role changes are
//! appended to daily JSONL files in the audit store. Entries are never
//! mutated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FileStorage, StorageResult};

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // Signup and session events
    Signup,
    SignupStart,
    SignupVerified,
    Login,
    Logout,

    // Catalog events
    ProductCreated,
    ProductUpdated,
    ProductDeleted,

    // Admin events
    RoleChanged,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: AuditEventType,
    /// User who triggered the event (if known).
    pub user_id: Option<String>,
    /// IP address of the request (if available).
    pub ip_address: Option<String>,
    /// User-agent header of the request (if available).
    pub user_agent: Option<String>,
    /// Additional details as JSON (e.g. the affected product id).
    #[schema(value_type = Option<Object>)]
    pub meta: Option<serde_json::Value>,
}

impl AuditEvent {
    /// Create a new audit event.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            user_id: None,
            ip_address: None,
            user_agent: None,
            meta: None,
        }
    }

    /// Set the user ID.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the client metadata captured from the request.
    pub fn with_client(mut self, ip: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip;
        self.user_agent = user_agent;
        self
    }

    /// Add details.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Repository for audit events.
pub struct AuditRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> AuditRepository<'a> {
    /// Create a new audit repository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Log an audit event.
    ///
    /// Events are appended to a daily log file in JSONL format.
    pub fn log(&self, event: &AuditEvent) -> StorageResult<()> {
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        let path = self.storage.paths().audit_events_file(&date);

        // Read existing events (or empty if file doesn't exist)
        let mut content = self.storage.read_raw(&path).unwrap_or_default();

        // Append new event as JSONL (one JSON object per line)
        let event_json = serde_json::to_string(event)?;

        if !content.is_empty() && !content.ends_with(b"\n") {
            content.push(b'\n');
        }
        content.extend_from_slice(event_json.as_bytes());
        content.push(b'\n');

        self.storage.write_raw(&path, &content)
    }

    /// Read audit events for a specific date, in write order.
    pub fn read_events(&self, date: &str) -> StorageResult<Vec<AuditEvent>> {
        let path = self.storage.paths().audit_events_file(date);
        let content = self.storage.read_raw(&path)?;

        let content_str = String::from_utf8(content).map_err(|e| {
            super::StorageError::Corrupted(format!("Invalid UTF-8 in audit log: {e}"))
        })?;

        let mut events = Vec::new();
        for line in content_str.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let event: AuditEvent = serde_json::from_str(line)?;
            events.push(event);
        }

        Ok(events)
    }

    /// Read the most recent events across all daily files, newest first.
    pub fn recent(&self, limit: usize) -> StorageResult<Vec<AuditEvent>> {
        let mut dates = self.storage.list_dirs(self.storage.paths().audit_dir())?;
        dates.sort_by(|a, b| b.cmp(a));

        let mut events = Vec::new();
        for date in dates {
            if events.len() >= limit {
                break;
            }
            if let Ok(mut day) = self.read_events(&date) {
                // Within a day the file is in append order; newest last
                day.reverse();
                events.extend(day);
            }
        }

        events.truncate(limit);
        Ok(events)
    }
}

/// Helper macro for logging audit events.
///
/// Audit writes are best-effort: a failed write never fails the operation
/// that triggered it.
#[macro_export]
macro_rules! audit_log {
    ($storage:expr, $event_type:expr, $user_id:expr, $client:expr) => {{
        let repo = $crate::storage::AuditRepository::new($storage);
        let event = $crate::storage::AuditEvent::new($event_type)
            .with_user($user_id)
            .with_client($client.ip.clone(), $client.user_agent.clone());
        if let Err(e) = repo.log(&event) {
            tracing::warn!(error = %e, "audit write failed");
        }
    }};
    ($storage:expr, $event_type:expr, $user_id:expr, $client:expr, $meta:expr) => {{
        let repo = $crate::storage::AuditRepository::new($storage);
        let event = $crate::storage::AuditEvent::new($event_type)
            .with_user($user_id)
            .with_client($client.ip.clone(), $client.user_agent.clone())
            .with_meta($meta);
        if let Err(e) = repo.log(&event) {
            tracing::warn!(error = %e, "audit write failed");
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, StoragePaths};
    use chrono::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage) {
        let temp = TempDir::new().unwrap();
        let paths = StoragePaths::new(temp.path().to_str().unwrap());
        let mut storage = FileStorage::new(paths);
        storage.initialize().unwrap();
        (temp, storage)
    }

    #[test]
    fn create_audit_event() {
        let event = AuditEvent::new(AuditEventType::ProductCreated)
            .with_user("user_123")
            .with_client(Some("192.168.1.1".to_string()), Some("test-agent".to_string()))
            .with_meta(serde_json::json!({ "productId": "prod_abc" }));

        assert_eq!(event.event_type, AuditEventType::ProductCreated);
        assert_eq!(event.user_id, Some("user_123".to_string()));
        assert_eq!(event.ip_address, Some("192.168.1.1".to_string()));
        assert_eq!(event.user_agent, Some("test-agent".to_string()));
        assert!(event.meta.is_some());
    }

    #[test]
    fn event_serializes_with_camel_case_keys() {
        let event = AuditEvent::new(AuditEventType::SignupStart).with_user("u1");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "signup_start");
        assert_eq!(json["userId"], "u1");
        assert!(json.get("ipAddress").is_some());
        assert!(json.get("userAgent").is_some());
    }

    #[test]
    fn log_and_read_events() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);

        let event1 = AuditEvent::new(AuditEventType::SignupStart).with_user("user_1");
        let event2 = AuditEvent::new(AuditEventType::Login).with_user("user_2");

        repo.log(&event1).unwrap();
        repo.log(&event2).unwrap();

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let events = repo.read_events(&today).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, AuditEventType::SignupStart);
        assert_eq!(events[1].event_type, AuditEventType::Login);
    }

    #[test]
    fn recent_returns_newest_first_across_days() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);

        let mut old_event = AuditEvent::new(AuditEventType::Login).with_user("old_user");
        old_event.timestamp = Utc::now() - Duration::days(2);
        repo.log(&old_event).unwrap();

        let new_event = AuditEvent::new(AuditEventType::ProductDeleted).with_user("new_user");
        repo.log(&new_event).unwrap();

        let events = repo.recent(10).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].user_id, Some("new_user".to_string()));
        assert_eq!(events[1].user_id, Some("old_user".to_string()));
    }

    #[test]
    fn recent_respects_limit() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);

        for i in 0..5 {
            repo.log(&AuditEvent::new(AuditEventType::Login).with_user(format!("user_{i}")))
                .unwrap();
        }

        let events = repo.recent(3).unwrap();
        assert_eq!(events.len(), 3);
        // Newest three, in reverse write order
        assert_eq!(events[0].user_id, Some("user_4".to_string()));
        assert_eq!(events[2].user_id, Some("user_2".to_string()));
    }
}
