use log::warn;
use regex::Regex;

use crate::domain::{ConstraintItem, FieldState, FieldValue};

use super::error::ConstraintViolation;

/// Checks a leaf against its constraint list and records the outcome on the
/// `valid` flag. Returns every violation so the caller can surface messages
/// inline; an invalid leaf never blocks other leaves from committing.
pub fn validate_field(field: &mut FieldState) -> Vec<ConstraintViolation> {
    let violations = match &field.value {
        Some(value) => field
            .constraints
            .iter()
            .filter_map(|constraint| check_constraint(constraint, value))
            .collect(),
        None => Vec::new(),
    };
    field.valid = violations.is_empty();
    violations
}

fn check_constraint(constraint: &ConstraintItem, value: &FieldValue) -> Option<ConstraintViolation> {
    let failed = match constraint.kind.as_str() {
        "maxlength" => length_of(value) > numeric_limit(constraint)? as usize,
        "minlength" => length_of(value) < numeric_limit(constraint)? as usize,
        "pattern" => !matches_pattern(&constraint.value, value)?,
        "min" => numeric_of(value)? < numeric_limit(constraint)?,
        "max" => numeric_of(value)? > numeric_limit(constraint)?,
        // cols, rows, size, resize and format are presentation hints the
        // backend validates on its own side.
        _ => false,
    };

    failed.then(|| ConstraintViolation {
        constraint: constraint.kind.clone(),
        message: constraint
            .message
            .clone()
            .unwrap_or_else(|| default_message(constraint)),
    })
}

fn default_message(constraint: &ConstraintItem) -> String {
    match constraint.kind.as_str() {
        "maxlength" => format!("must be at most {} characters", constraint.value),
        "minlength" => format!("must be at least {} characters", constraint.value),
        "pattern" => format!("must match pattern {}", constraint.value),
        "min" => format!("must be at least {}", constraint.value),
        "max" => format!("must be at most {}", constraint.value),
        other => format!("violates constraint {other}"),
    }
}

fn length_of(value: &FieldValue) -> usize {
    match value {
        FieldValue::Text(text) => text.chars().count(),
        FieldValue::Seq(items) => items.len(),
        other => other.to_string().chars().count(),
    }
}

fn numeric_of(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Int(int) => Some(*int as f64),
        FieldValue::Float(float) => Some(*float),
        _ => None,
    }
}

fn numeric_limit(constraint: &ConstraintItem) -> Option<f64> {
    match constraint.value.parse::<f64>() {
        Ok(limit) => Some(limit),
        Err(_) => {
            warn!(
                "constraint {} carries non-numeric limit '{}'",
                constraint.kind, constraint.value
            );
            None
        }
    }
}

fn matches_pattern(pattern: &str, value: &FieldValue) -> Option<bool> {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(error) => {
            warn!("skipping unparseable pattern constraint '{pattern}': {error}");
            return None;
        }
    };
    let text = match value {
        FieldValue::Text(text) => text.clone(),
        other => other.to_string(),
    };
    Some(regex.is_match(&text))
}

#[cfg(test)]
mod tests {
    use crate::domain::FieldKind;

    use super::*;

    fn field_with(value: FieldValue, constraints: Vec<ConstraintItem>) -> FieldState {
        FieldState {
            value: Some(value),
            constraints,
            ..FieldState::default()
        }
    }

    fn constraint(kind: &str, value: &str) -> ConstraintItem {
        ConstraintItem {
            kind: kind.to_string(),
            value: value.to_string(),
            message: None,
        }
    }

    #[test]
    fn min_and_max_bound_numeric_values() {
        let mut field = field_with(
            FieldValue::Int(99),
            vec![constraint("min", "1"), constraint("max", "65535")],
        );
        assert!(validate_field(&mut field).is_empty());
        assert!(field.valid);

        field.value = Some(FieldValue::Int(0));
        let violations = validate_field(&mut field);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint, "min");
        assert!(!field.valid);
    }

    #[test]
    fn length_constraints_apply_to_text() {
        let mut field = field_with(
            FieldValue::Text("abcdef".to_string()),
            vec![constraint("maxlength", "4")],
        );
        assert_eq!(validate_field(&mut field).len(), 1);

        field.value = Some(FieldValue::Text("abc".to_string()));
        assert!(validate_field(&mut field).is_empty());
    }

    #[test]
    fn pattern_constraint_uses_regex() {
        let mut field = field_with(
            FieldValue::Text("host-01".to_string()),
            vec![constraint("pattern", "^[a-z]+-[0-9]+$")],
        );
        assert!(validate_field(&mut field).is_empty());

        field.value = Some(FieldValue::Text("HOST".to_string()));
        assert_eq!(validate_field(&mut field).len(), 1);
    }

    #[test]
    fn presentation_constraints_always_pass() {
        let mut field = field_with(
            FieldValue::Text("anything".to_string()),
            vec![constraint("cols", "80"), constraint("resize", "none")],
        );
        assert!(validate_field(&mut field).is_empty());
        assert!(field.valid);
    }

    #[test]
    fn custom_message_wins_over_default() {
        let mut item = constraint("min", "10");
        item.message = Some("too small".to_string());
        let mut field = field_with(FieldValue::Int(1), vec![item]);
        let violations = validate_field(&mut field);
        assert_eq!(violations[0].message, "too small");
    }

    #[test]
    fn valueless_field_validates_clean() {
        let mut field = FieldState {
            kind: FieldKind::String,
            constraints: vec![constraint("minlength", "3")],
            ..FieldState::default()
        };
        assert!(validate_field(&mut field).is_empty());
        assert!(field.valid);
    }
}
