use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::field::FieldDescriptor;

// ---------------------------------------------------------------------------
// The Container: FormSchema
// One form template as built in the admin panel. Lifecycle is
// create -> (optionally) version -> deactivate; live fields never change
// meaning under a submission's feet.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    /// Builds a schema, rejecting duplicate field names up front.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let schema = FormSchema {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            fields,
        };
        schema.check_unique_names()?;
        Ok(schema)
    }

    /// Re-validates a schema that arrived over a wire or out of storage.
    pub fn check_unique_names(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::Schema(format!(
                    "Duplicate field name '{}' in schema '{}'",
                    field.name, self.id
                )));
            }
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldType;

    fn text_field(name: &str) -> FieldDescriptor {
        FieldDescriptor {
            id: format!("fld-{name}"),
            name: name.to_string(),
            field_type: FieldType::Text,
            label: name.to_string(),
            required: false,
            options: Vec::new(),
            placeholder: None,
        }
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let result = FormSchema::new(
            "s1",
            "Event Report",
            "",
            vec![text_field("location"), text_field("location")],
        );
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn lookup_by_name() {
        let schema = FormSchema::new(
            "s1",
            "Event Report",
            "",
            vec![text_field("location"), text_field("summary")],
        )
        .unwrap();
        assert!(schema.field("summary").is_some());
        assert!(schema.field("missing").is_none());
    }
}
