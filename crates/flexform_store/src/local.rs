use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use flexform_core::models::{FieldValue, FormSchema};

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// Injected key/value persistence. The browser portal leaned on local storage
// as an ambient global; here the same keys go through an explicit trait so
// templates and drafts can live in memory under test and on disk in the
// shell.
// ---------------------------------------------------------------------------

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Form templates keyed by template id, mirroring the portal's
/// `flexform.templates.<id>` local-storage convention.
pub struct TemplateStore<S: KeyValueStore> {
    backing: S,
}

impl<S: KeyValueStore> TemplateStore<S> {
    pub fn new(backing: S) -> Self {
        TemplateStore { backing }
    }

    pub fn save(&self, schema: &FormSchema) -> Result<()> {
        schema
            .check_unique_names()
            .map_err(|err| StoreError::Store(err.to_string()))?;
        let serialized = serde_json::to_string(schema)
            .map_err(|err| StoreError::Store(err.to_string()))?;
        self.backing.set(&template_key(&schema.id), &serialized);
        Ok(())
    }

    pub fn load(&self, id: &str) -> Result<FormSchema> {
        let raw = self
            .backing
            .get(&template_key(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        serde_json::from_str(&raw).map_err(|err| StoreError::Store(err.to_string()))
    }

    pub fn delete(&self, id: &str) {
        self.backing.remove(&template_key(id));
    }
}

/// Unsaved partial submissions, keyed per template per user. Concurrent
/// writers last-write-win, same as the browser did.
pub struct DraftStore<S: KeyValueStore> {
    backing: S,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub fn new(backing: S) -> Self {
        DraftStore { backing }
    }

    pub fn save(
        &self,
        template_id: &str,
        user: &str,
        values: &BTreeMap<String, FieldValue>,
    ) -> Result<()> {
        let serialized = serde_json::to_string(values)
            .map_err(|err| StoreError::Store(err.to_string()))?;
        self.backing.set(&draft_key(template_id, user), &serialized);
        Ok(())
    }

    pub fn load(&self, template_id: &str, user: &str) -> Option<BTreeMap<String, FieldValue>> {
        let raw = self.backing.get(&draft_key(template_id, user))?;
        serde_json::from_str(&raw).ok()
    }

    pub fn discard(&self, template_id: &str, user: &str) {
        self.backing.remove(&draft_key(template_id, user));
    }
}

fn template_key(id: &str) -> String {
    format!("flexform.templates.{id}")
}

fn draft_key(template_id: &str, user: &str) -> String {
    format!("flexform.drafts.{template_id}.{user}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexform_core::models::{FieldDescriptor, FieldType};

    fn sample_schema() -> FormSchema {
        FormSchema::new(
            "evt-report",
            "Event Report",
            "",
            vec![FieldDescriptor {
                id: "f1".into(),
                name: "summary".into(),
                field_type: FieldType::Text,
                label: "Short Description".into(),
                required: true,
                options: Vec::new(),
                placeholder: None,
            }],
        )
        .unwrap()
    }

    #[test]
    fn templates_round_trip_through_memory() {
        let store = TemplateStore::new(MemoryStore::new());
        store.save(&sample_schema()).unwrap();

        let loaded = store.load("evt-report").unwrap();
        assert_eq!(loaded.name, "Event Report");
        assert_eq!(loaded.fields.len(), 1);

        store.delete("evt-report");
        assert!(matches!(
            store.load("evt-report"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn drafts_are_keyed_per_template_per_user() {
        let store = DraftStore::new(MemoryStore::new());
        let mut values = BTreeMap::new();
        values.insert("summary".to_string(), FieldValue::Text("wip".into()));

        store.save("evt-report", "a@example.com", &values).unwrap();
        assert_eq!(store.load("evt-report", "a@example.com"), Some(values));
        assert_eq!(store.load("evt-report", "b@example.com"), None);

        store.discard("evt-report", "a@example.com");
        assert_eq!(store.load("evt-report", "a@example.com"), None);
    }
}
