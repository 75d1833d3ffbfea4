use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use log::warn;
use serde_json::{Map, Value};

use crate::domain::{ArrayRow, ConstraintItem, Control, FieldKind, FieldState};

use super::value::{sniff_value, wire_value};

fn kind_from_wire(raw: &str) -> Option<FieldKind> {
    match raw {
        "string" => Some(FieldKind::String),
        "int" => Some(FieldKind::Int),
        "double" => Some(FieldKind::Double),
        "bool" => Some(FieldKind::Bool),
        "datetime" => Some(FieldKind::DateTime),
        "range" => Some(FieldKind::Range),
        "array" => Some(FieldKind::Array),
        "composite" => Some(FieldKind::Composite),
        "dict" => Some(FieldKind::Dict),
        _ => None,
    }
}

fn kind_to_wire(kind: FieldKind) -> Result<&'static str> {
    match kind {
        FieldKind::String => Ok("string"),
        FieldKind::Int => Ok("int"),
        FieldKind::Double => Ok("double"),
        FieldKind::Bool => Ok("bool"),
        FieldKind::DateTime => Ok("datetime"),
        FieldKind::Array => Ok("array"),
        FieldKind::Dict => Ok("dict"),
        other => bail!("field kind {other:?} has no wire representation"),
    }
}

fn sub_kind_to_wire(kind: FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::String => Some("string"),
        FieldKind::Int => Some("int"),
        FieldKind::Double => Some("double"),
        FieldKind::Bool => Some("bool"),
        FieldKind::DateTime => Some("datetime"),
        FieldKind::Dict => Some("dict"),
        FieldKind::Composite => Some("composite"),
        FieldKind::Array | FieldKind::Range => None,
    }
}

fn control_from_wire(raw: &str) -> Option<Control> {
    match raw {
        "input_control" => Some(Control::Text),
        "textarea_control" => Some(Control::Textarea),
        "label_control" => Some(Control::Label),
        "password_control" => Some(Control::Password),
        "checkbox_control" => Some(Control::Checkbox),
        "datetime_control" => Some(Control::Datetime),
        "time_control" => Some(Control::Time),
        "date_control" => Some(Control::Date),
        "radio_control" => Some(Control::Radio),
        "number_control" => Some(Control::Number),
        _ => None,
    }
}

fn control_to_wire(control: Control) -> Result<&'static str> {
    match control {
        Control::Text => Ok("input_control"),
        Control::Textarea => Ok("textarea_control"),
        Control::Label => Ok("label_control"),
        Control::Password => Ok("password_control"),
        Control::Date => Ok("date_control"),
        Control::Datetime => Ok("datetime_control"),
        Control::Time => Ok("time_control"),
        Control::Number => Ok("number_control"),
        Control::Checkbox => Ok("checkbox_control"),
        Control::Radio => Ok("radio_control"),
        other => bail!("control {other:?} has no wire representation"),
    }
}

/// Decodes one leaf fragment.
///
/// `index` is the 0-based position inside an enclosing array row, used to
/// resolve per-row `readOnly` maps; `disable` is the disablement inherited
/// from the enclosing container. Unknown `type`/`sub_type`/`control` strings
/// leave the prior value untouched so that newer backend schemas still load.
pub fn decode_field(raw: &Value, index: usize, disable: bool) -> Result<FieldState> {
    let object = raw
        .as_object()
        .context("field fragment must be a JSON object")?;
    let mut field = FieldState::default();
    let mut has_value = false;

    for (key, member) in object {
        match key.as_str() {
            "value" => {
                if !member.is_null() {
                    field.value = Some(sniff_value(member));
                    has_value = true;
                }
            }
            "file_id" => field.file_id = text(member),
            "type" => match kind_from_wire(&text(member)) {
                Some(kind) => field.kind = kind,
                None => warn!("ignoring unknown field type {member}"),
            },
            "sub_type" => match kind_from_wire(&text(member)) {
                Some(kind) => field.sub_kind = kind,
                None => {
                    if !member.is_null() {
                        warn!("ignoring unknown field sub_type {member}");
                    }
                }
            },
            "control" => match control_from_wire(&text(member)) {
                Some(control) => field.control = control,
                None => warn!("ignoring unknown control {member}"),
            },
            "description" => field.description = optional_text(member),
            "display_name" => field.display_name = optional_text(member),
            "placeholder" => field.placeholder = optional_text(member),
            "autocomplete" => field.autocomplete = optional_text(member),
            "readOnly" => field.read_only = read_only_flag(member, index),
            "commented" => field.commented = member.as_bool().unwrap_or(false),
            "additional" => field.additional = member.as_bool().unwrap_or(false),
            "isValid" => field.valid = member.as_bool().unwrap_or(true),
            "constraints" => {
                if !member.is_null() {
                    field.constraints = serde_json::from_value::<Vec<ConstraintItem>>(
                        member.clone(),
                    )
                    .context("malformed constraints list")?;
                }
            }
            // Nested schemas are decoded below, once the flags they inherit
            // from are settled.
            "sub_type_schema" | "array_sub_type_schema" => {}
            _ => {}
        }
    }

    field.disabled = field.commented || disable;
    field.active = !(field.additional && !has_value);

    if let Some(sub) = object.get("sub_type_schema").and_then(Value::as_object) {
        // Array containers do not forward their own disablement onto the row
        // template; rows are gated individually through readOnly-by-index.
        let forward = field.disabled && field.kind != FieldKind::Array;
        for (key, member) in sub {
            if member.is_null() {
                continue;
            }
            field
                .sub_schema
                .insert(key.clone(), decode_field(member, 0, forward)?);
        }
    }

    if let Some(rows) = object.get("array_sub_type_schema").and_then(Value::as_array) {
        for (row_index, row) in rows.iter().enumerate() {
            let Some(row_object) = row.as_object() else {
                continue;
            };
            let mut elements = IndexMap::new();
            for (key, member) in row_object {
                if member.is_null() {
                    continue;
                }
                elements.insert(
                    key.clone(),
                    decode_field(member, row_index, field.disabled)?,
                );
            }
            field.array_sub_schema.push(ArrayRow {
                elements,
                expanded: false,
            });
        }
    }

    Ok(field)
}

/// Serializes a leaf back to the flat wire object the backend expects.
///
/// Strict by design: every value reaching this point was created by the UI,
/// so an unmapped enum variant is a programming error, not input noise.
pub fn encode_field(field: &FieldState) -> Result<Value> {
    let mut out = Map::new();
    out.insert(
        "value".to_string(),
        field.value.as_ref().map(wire_value).unwrap_or(Value::Null),
    );
    out.insert("file_id".to_string(), Value::String(field.file_id.clone()));
    out.insert(
        "type".to_string(),
        Value::String(kind_to_wire(field.kind)?.to_string()),
    );
    out.insert(
        "sub_type".to_string(),
        match sub_kind_to_wire(field.sub_kind) {
            Some(name) => Value::String(name.to_string()),
            None => Value::Null,
        },
    );
    out.insert("description".to_string(), optional_string(&field.description));
    out.insert("readOnly".to_string(), Value::Bool(field.read_only));
    out.insert(
        "display_name".to_string(),
        optional_string(&field.display_name),
    );
    out.insert(
        "control".to_string(),
        Value::String(control_to_wire(field.control)?.to_string()),
    );
    out.insert(
        "constraints".to_string(),
        serde_json::to_value(&field.constraints).context("constraints serialization")?,
    );
    out.insert("sub_type_schema".to_string(), {
        if field.sub_schema.is_empty() {
            Value::Null
        } else {
            let mut nested = Map::new();
            for (key, sub_field) in &field.sub_schema {
                nested.insert(key.clone(), encode_field(sub_field)?);
            }
            Value::Object(nested)
        }
    });
    out.insert("array_sub_type_schema".to_string(), {
        if field.array_sub_schema.is_empty() {
            Value::Null
        } else {
            let mut rows = Vec::new();
            for row in &field.array_sub_schema {
                let mut elements = Map::new();
                for (key, sub_field) in &row.elements {
                    elements.insert(key.clone(), encode_field(sub_field)?);
                }
                rows.push(Value::Object(elements));
            }
            Value::Array(rows)
        }
    });
    out.insert("isValid".to_string(), Value::Bool(field.valid));
    Ok(Value::Object(out))
}

fn read_only_flag(member: &Value, index: usize) -> bool {
    if let Some(flag) = member.as_bool() {
        return flag;
    }
    // Per-row policy: a map from 1-based array position to flag.
    member
        .as_object()
        .and_then(|positions| positions.get(&(index + 1).to_string()))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn text(member: &Value) -> String {
    match member {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn optional_text(member: &Value) -> Option<String> {
    match member {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn optional_string(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::String(text.clone()),
        None => Value::Null,
    }
}
