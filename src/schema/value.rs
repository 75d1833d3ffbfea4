use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

use crate::domain::FieldValue;

/// Resolves a raw JSON payload into a typed [`FieldValue`].
///
/// Strings go through ordered sniffing: integer, float, boolean, datetime,
/// else plain text. The sniffing is lossy for fields that are semantically
/// strings of digits; that matches the backend's own treatment and is kept
/// as-is.
pub fn sniff_value(raw: &Value) -> FieldValue {
    match raw {
        Value::Number(number) => match number.as_i64() {
            Some(int) => FieldValue::Int(int),
            None => FieldValue::Float(number.as_f64().unwrap_or_default()),
        },
        Value::Bool(flag) => FieldValue::Bool(*flag),
        Value::String(text) => sniff_text(text),
        Value::Array(items) => FieldValue::Seq(items.iter().map(sniff_value).collect()),
        Value::Object(entries) => FieldValue::Map(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), sniff_value(value)))
                .collect(),
        ),
        Value::Null => FieldValue::Text(String::new()),
    }
}

fn sniff_text(text: &str) -> FieldValue {
    if let Ok(int) = text.parse::<i64>() {
        return FieldValue::Int(int);
    }
    if let Ok(float) = text.parse::<f64>() {
        return FieldValue::Float(float);
    }
    if let Ok(flag) = text.parse::<bool>() {
        return FieldValue::Bool(flag);
    }
    if let Some(stamp) = parse_datetime(text) {
        return FieldValue::DateTime(stamp);
    }
    FieldValue::Text(text.to_string())
}

pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim().trim_end_matches('Z');
    if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(stamp);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Converts a typed payload back into the JSON shape the backend expects.
pub fn wire_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Int(int) => Value::Number(Number::from(*int)),
        FieldValue::Float(float) => Number::from_f64(*float)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FieldValue::Bool(flag) => Value::Bool(*flag),
        FieldValue::DateTime(stamp) => Value::String(format_datetime(stamp)),
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Seq(items) => Value::Array(items.iter().map(wire_value).collect()),
        FieldValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), wire_value(value)))
                .collect(),
        ),
    }
}

fn format_datetime(stamp: &NaiveDateTime) -> String {
    use chrono::Timelike;
    if stamp.nanosecond() == 0 {
        stamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        stamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sniffing_prefers_integer_over_float_and_string() {
        assert_eq!(sniff_value(&json!("5")), FieldValue::Int(5));
        assert_eq!(sniff_value(&json!("5.5")), FieldValue::Float(5.5));
        assert_eq!(sniff_value(&json!("true")), FieldValue::Bool(true));
        assert_eq!(
            sniff_value(&json!("hello")),
            FieldValue::Text("hello".to_string())
        );
    }

    #[test]
    fn sniffing_recognizes_datetime_strings() {
        match sniff_value(&json!("2024-01-02T03:04:05")) {
            FieldValue::DateTime(stamp) => {
                assert_eq!(format_datetime(&stamp), "2024-01-02T03:04:05");
            }
            other => panic!("expected datetime, got {other:?}"),
        }
    }

    #[test]
    fn sniffing_recurses_into_arrays_and_objects() {
        let value = sniff_value(&json!(["1", {"inner": "false"}]));
        let FieldValue::Seq(items) = value else {
            panic!("expected sequence");
        };
        assert_eq!(items[0], FieldValue::Int(1));
        let FieldValue::Map(entries) = &items[1] else {
            panic!("expected mapping");
        };
        assert_eq!(entries["inner"], FieldValue::Bool(false));
    }

    #[test]
    fn wire_value_round_trips_typed_payloads() {
        let original = json!([5, 2.5, true, "plain text"]);
        assert_eq!(wire_value(&sniff_value(&original)), original);
    }
}
