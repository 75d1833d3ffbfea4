use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Primitive or structural type of a configuration field. Containers
/// (`Array`, `Composite`, `Dict`) describe their element type through
/// [`FieldState::sub_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    String,
    Int,
    Double,
    Bool,
    DateTime,
    Range,
    Array,
    Composite,
    Dict,
}

/// Input-widget hint reported by the backend. Presentation only; validation
/// runs against [`FieldState::constraints`] regardless of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Text,
    Textarea,
    Password,
    Date,
    Datetime,
    Time,
    Number,
    Checkbox,
    Radio,
    Label,
    Fieldset,
    Range,
}

/// One validation rule, evaluated client-side against the field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Dynamically-typed field payload, resolved at decode time by ordered
/// sniffing (int, float, bool, datetime, string).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Text(String),
    Seq(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
            FieldValue::Text(value) => write!(f, "{value}"),
            FieldValue::Seq(items) => {
                let rendered: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            FieldValue::Map(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}

/// One row of a repeated array field: a keyed bag of sibling leaves plus the
/// UI expansion flag for the row.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRow {
    pub elements: IndexMap<String, FieldState>,
    pub expanded: bool,
}

/// A single editable configuration leaf.
///
/// The durable identity of a leaf for change tracking is the pair
/// (`file_id`, dotted input path); the struct itself is freely cloneable and
/// every container it owns is deep-copied with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub kind: FieldKind,
    pub sub_kind: FieldKind,
    pub value: Option<FieldValue>,
    pub file_id: String,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub placeholder: Option<String>,
    pub autocomplete: Option<String>,
    pub control: Control,
    pub constraints: Vec<ConstraintItem>,
    pub read_only: bool,
    pub commented: bool,
    /// Derived: `commented` or disablement inherited from a container.
    pub disabled: bool,
    pub additional: bool,
    /// Optional ("additional") fields stay inactive until given a value.
    pub active: bool,
    pub valid: bool,
    pub sub_schema: IndexMap<String, FieldState>,
    pub array_sub_schema: Vec<ArrayRow>,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            kind: FieldKind::String,
            sub_kind: FieldKind::String,
            value: None,
            file_id: String::new(),
            description: None,
            display_name: None,
            placeholder: None,
            autocomplete: None,
            control: Control::Text,
            constraints: Vec::new(),
            read_only: false,
            commented: false,
            disabled: false,
            additional: false,
            active: true,
            valid: true,
            sub_schema: IndexMap::new(),
            array_sub_schema: Vec::new(),
        }
    }
}

impl FieldState {
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }

    pub fn display_value(&self) -> String {
        match &self.value {
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }

    /// Whether the leaf carries a materialized value. Optional fields with no
    /// value yet report `false` and stay inactive.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}
