use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// The Building Block: FieldDescriptor
// One entry per input control in a form template.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
    Textarea,
    File,
}

impl FieldType {
    /// Whether this control type carries a list of predefined options.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,

    /// Identity of the field within one schema. Must be unique; once a
    /// submission references it the semantics are frozen.
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub label: String,

    #[serde(default)]
    pub required: bool,

    /// Ordered option strings for select/radio/checkbox controls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

// ---------------------------------------------------------------------------
// The Value: a tagged union decided at the schema boundary.
// Replaces the loose string-or-bool record shapes the legacy portal shuffled
// between renderer, importer and store.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    // Date before Text: ISO date strings deserialize as dates.
    Date(NaiveDate),
    Text(String),
    StringList(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Flat display form used by exports and by the canonical hash.
    /// Lists join with a comma, null renders empty.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(flag) => flag.to_string(),
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::StringList(items) => items.join(","),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_round_trip_keeps_shapes() {
        let json = serde_json::json!({
            "a": "plain",
            "b": 4.5,
            "c": true,
            "d": ["x", "y"],
            "e": null,
            "f": "2025-10-01",
        });
        let map: std::collections::BTreeMap<String, FieldValue> =
            serde_json::from_value(json).unwrap();

        assert_eq!(map["a"], FieldValue::Text("plain".into()));
        assert_eq!(map["b"], FieldValue::Number(4.5));
        assert_eq!(map["c"], FieldValue::Bool(true));
        assert_eq!(
            map["d"],
            FieldValue::StringList(vec!["x".into(), "y".into()])
        );
        assert_eq!(map["e"], FieldValue::Null);
        assert_eq!(
            map["f"],
            FieldValue::Date(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap())
        );
    }

    #[test]
    fn display_flattens_lists_and_nulls() {
        assert_eq!(FieldValue::Null.display(), "");
        assert_eq!(
            FieldValue::StringList(vec!["a".into(), "b".into()]).display(),
            "a,b"
        );
        assert_eq!(FieldValue::Number(4.0).display(), "4");
    }
}
