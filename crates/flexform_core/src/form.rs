use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::dates;
use crate::error::{Error, FieldViolation, Result};
use crate::models::field::{FieldType, FieldValue};
use crate::models::schema::FormSchema;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

// ---------------------------------------------------------------------------
// Headless form renderer.
// `render` turns a schema into one widget description per field, in order;
// the widgets hold raw input state and `read` converts it back into typed
// values, collecting every violation instead of stopping at the first.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TextBox,
    EmailBox,
    NumberBox,
    DateBox,
    Dropdown,
    RadioGroup,
    /// A checkbox field with options renders as a group; without options it
    /// is a single yes/no box.
    CheckboxGroup,
    CheckboxSingle,
    MultilineBox,
    FilePicker,
}

#[derive(Debug, Clone)]
enum InputState {
    Text(String),
    Checked(bool),
    Multi(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct RenderedInput {
    pub name: String,
    pub label: String,
    pub control: Control,
    pub required: bool,
    pub options: Vec<String>,
    pub placeholder: Option<String>,
    state: InputState,
}

impl RenderedInput {
    pub fn text(&self) -> &str {
        match &self.state {
            InputState::Text(value) => value,
            _ => "",
        }
    }

    pub fn checked(&self) -> bool {
        matches!(self.state, InputState::Checked(true))
    }

    pub fn selected(&self) -> &[String] {
        match &self.state {
            InputState::Multi(values) => values,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedForm {
    schema_id: String,
    inputs: Vec<RenderedInput>,
}

pub fn render(schema: &FormSchema) -> RenderedForm {
    let inputs = schema
        .fields
        .iter()
        .map(|field| {
            let control = control_for(field.field_type, !field.options.is_empty());
            let state = match control {
                Control::CheckboxSingle => InputState::Checked(false),
                Control::CheckboxGroup => InputState::Multi(Vec::new()),
                _ => InputState::Text(String::new()),
            };
            RenderedInput {
                name: field.name.clone(),
                label: field.label.clone(),
                control,
                required: field.required,
                options: field.options.clone(),
                placeholder: field.placeholder.clone(),
                state,
            }
        })
        .collect();

    RenderedForm {
        schema_id: schema.id.clone(),
        inputs,
    }
}

fn control_for(field_type: FieldType, has_options: bool) -> Control {
    match field_type {
        FieldType::Text => Control::TextBox,
        FieldType::Email => Control::EmailBox,
        FieldType::Number => Control::NumberBox,
        FieldType::Date => Control::DateBox,
        FieldType::Select => Control::Dropdown,
        FieldType::Radio => Control::RadioGroup,
        FieldType::Checkbox if has_options => Control::CheckboxGroup,
        FieldType::Checkbox => Control::CheckboxSingle,
        FieldType::Textarea => Control::MultilineBox,
        FieldType::File => Control::FilePicker,
    }
}

impl RenderedForm {
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn inputs(&self) -> &[RenderedInput] {
        &self.inputs
    }

    /// Types a value into a text-bearing control (also selects a dropdown or
    /// radio option, which carry their choice as text).
    pub fn set_text(&mut self, name: &str, value: &str) -> Result<()> {
        let input = self.input_mut(name)?;
        input.state = InputState::Text(value.to_string());
        Ok(())
    }

    /// Ticks or clears a single checkbox.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<()> {
        let input = self.input_mut(name)?;
        input.state = InputState::Checked(checked);
        Ok(())
    }

    /// Toggles one option of a checkbox group. Selections read back in the
    /// schema's option order regardless of click order.
    pub fn toggle_option(&mut self, name: &str, option: &str) -> Result<()> {
        let input = self.input_mut(name)?;
        let mut current = match &input.state {
            InputState::Multi(values) => values.clone(),
            _ => Vec::new(),
        };
        if let Some(position) = current.iter().position(|item| item == option) {
            current.remove(position);
        } else {
            current.push(option.to_string());
        }
        input.state = InputState::Multi(current);
        Ok(())
    }

    /// Reads current input state back into typed values. Required fields
    /// failing presence and email fields failing the shape check all report
    /// together in one `Validation` error.
    pub fn read(&self) -> Result<BTreeMap<String, FieldValue>> {
        let mut values = BTreeMap::new();
        let mut violations = Vec::new();

        for input in &self.inputs {
            let value = match input.control {
                Control::CheckboxSingle => FieldValue::Bool(input.checked()),
                Control::CheckboxGroup => {
                    // Serialize in option order, not click order.
                    let picked: Vec<String> = input
                        .options
                        .iter()
                        .filter(|option| input.selected().contains(*option))
                        .cloned()
                        .collect();
                    FieldValue::StringList(picked)
                }
                Control::NumberBox => read_number(input.text()),
                Control::DateBox => read_date(input.text()),
                Control::EmailBox => {
                    let raw = input.text().trim();
                    if !raw.is_empty() && !EMAIL_RE.is_match(raw) {
                        violations.push(FieldViolation {
                            field: input.name.clone(),
                            reason: "Not a valid email address".to_string(),
                        });
                    }
                    read_text(raw)
                }
                _ => read_text(input.text()),
            };

            if input.required && is_absent(&value) {
                violations.push(FieldViolation {
                    field: input.name.clone(),
                    reason: "Required field is missing".to_string(),
                });
            }

            values.insert(input.name.clone(), value);
        }

        if violations.is_empty() {
            Ok(values)
        } else {
            Err(Error::Validation(violations))
        }
    }

    fn input_mut(&mut self, name: &str) -> Result<&mut RenderedInput> {
        self.inputs
            .iter_mut()
            .find(|input| input.name == name)
            .ok_or_else(|| Error::Schema(format!("No field named '{name}' in rendered form")))
    }
}

fn read_text(raw: &str) -> FieldValue {
    if raw.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::Text(raw.to_string())
    }
}

fn read_number(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(number) => FieldValue::Number(number),
        // Only presence and email shape are validated; a non-numeric entry
        // passes through as text the way the legacy portal sent it.
        Err(_) => FieldValue::Text(trimmed.to_string()),
    }
}

fn read_date(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    match dates::normalize(trimmed) {
        Some(date) => FieldValue::Date(date),
        None => FieldValue::Text(trimmed.to_string()),
    }
}

fn is_absent(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::Bool(checked) => !checked,
        FieldValue::StringList(items) => items.is_empty(),
        FieldValue::Text(text) => text.trim().is_empty(),
        _ => false,
    }
}
