use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::field::FieldValue;

// ---------------------------------------------------------------------------
// The Payload: SubmissionRecord
// One row in the remote submissions table. Form-specific values live in the
// flattened `fields` map; everything else is fixed metadata the store and the
// dashboard rely on. Never mutated after creation except by the store's own
// audit trigger.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Assigned by the store on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    pub created_by: String,

    /// Always one of the closed classifier set, `general` when nothing
    /// matched the location string.
    pub department: String,

    pub security_classification: String,

    /// SHA-256 over the key-sorted field set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_batch: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit_log: Vec<AuditEntry>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

impl SubmissionRecord {
    pub fn new(created_by: impl Into<String>) -> Self {
        SubmissionRecord {
            id: None,
            created_at: Utc::now(),
            created_by: created_by.into(),
            department: "general".to_string(),
            security_classification: "internal".to_string(),
            data_hash: None,
            import_batch: None,
            audit_log: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn push_audit(&mut self, action: impl Into<String>, user: impl Into<String>) {
        self.audit_log.push(AuditEntry {
            action: action.into(),
            timestamp: Utc::now(),
            user: user.into(),
        });
    }

    /// Canonical integrity hash: `name=value` lines in key order, SHA-256,
    /// lowercase hex. BTreeMap iteration already provides the sort.
    pub fn canonical_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, value) in &self.fields {
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.display().as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }

    /// Seals the record for transmission: computes `data_hash` over the
    /// current field set.
    pub fn seal(&mut self) {
        self.data_hash = Some(self.canonical_hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_hash_is_order_independent() {
        let mut first = SubmissionRecord::new("a@b.co");
        first.fields.insert("zeta".into(), FieldValue::Text("1".into()));
        first.fields.insert("alpha".into(), FieldValue::Text("2".into()));

        let mut second = SubmissionRecord::new("a@b.co");
        second.fields.insert("alpha".into(), FieldValue::Text("2".into()));
        second.fields.insert("zeta".into(), FieldValue::Text("1".into()));

        assert_eq!(first.canonical_hash(), second.canonical_hash());
    }

    #[test]
    fn canonical_hash_tracks_values() {
        let mut record = SubmissionRecord::new("a@b.co");
        record.fields.insert("alpha".into(), FieldValue::Text("2".into()));
        let before = record.canonical_hash();
        record.fields.insert("alpha".into(), FieldValue::Text("3".into()));
        assert_ne!(before, record.canonical_hash());
    }

    #[test]
    fn wire_shape_flattens_fields() {
        let mut record = SubmissionRecord::new("user@example.com");
        record
            .fields
            .insert("location".into(), FieldValue::Text("NYA Building 4".into()));
        record.seal();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["location"], "NYA Building 4");
        assert_eq!(json["department"], "general");
        assert!(json.get("id").is_none());

        let back: SubmissionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(
            back.fields["location"],
            FieldValue::Text("NYA Building 4".into())
        );
    }
}
