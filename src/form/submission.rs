use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::ops::RangeInclusive;

use super::labels::Label;

/// Which rule a posted field broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Required,
    Type,
    Range,
    OneOf,
    Format,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: Constraint,
    pub message: String,
}

/// Every field-level problem found in one submission
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: &str, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.to_string(),
                constraint,
                message: message.into(),
            }],
        }
    }

    /// True if `field` is among the offending fields
    pub fn names(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn constraint_for(&self, field: &str) -> Option<Constraint> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.constraint)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input")?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Builds a typed request out of a raw JSON form submission
pub trait Validate: Sized {
    fn validate(raw: &Value) -> Result<Self, ValidationError>;
}

/// Decodes a request body; anything that is not JSON is reported against `body`
pub fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
    serde_json::from_slice(body).map_err(|e| {
        ValidationError::single("body", Constraint::Type, format!("is not valid JSON ({})", e))
    })
}

/// Reads fields out of a posted form, coercing the string values HTML inputs
/// produce and collecting every violation instead of stopping at the first.
///
/// Each reader returns `None` exactly when it recorded a violation.
pub struct Submission<'a> {
    fields: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Submission<'a> {
    pub fn new(raw: &'a Value) -> Result<Self, ValidationError> {
        match raw.as_object() {
            Some(fields) => Ok(Self {
                fields,
                violations: Vec::new(),
            }),
            None => Err(ValidationError::single(
                "body",
                Constraint::Type,
                "must be a JSON object",
            )),
        }
    }

    /// Whole number within `range`
    pub fn integer(&mut self, field: &str, range: RangeInclusive<i64>) -> Option<i64> {
        let value = self.present(field)?;
        let Some(number) = as_integer(value) else {
            self.reject(field, Constraint::Type, "must be a whole number");
            return None;
        };
        if !range.contains(&number) {
            self.reject(
                field,
                Constraint::Range,
                format!("must be between {} and {}", range.start(), range.end()),
            );
            return None;
        }
        Some(number)
    }

    /// Non-negative whole number, e.g. a visit count
    pub fn count(&mut self, field: &str) -> Option<u32> {
        let value = self.present(field)?;
        let Some(number) = as_integer(value) else {
            self.reject(field, Constraint::Type, "must be a whole number");
            return None;
        };
        match u32::try_from(number) {
            Ok(count) => Some(count),
            Err(_) if number < 0 => {
                self.reject(field, Constraint::Range, "must not be negative");
                None
            }
            Err(_) => {
                self.reject(field, Constraint::Range, format!("must be at most {}", u32::MAX));
                None
            }
        }
    }

    /// Finite number within `range`
    pub fn number(&mut self, field: &str, range: RangeInclusive<f64>) -> Option<f64> {
        let number = self.finite(field)?;
        if !range.contains(&number) {
            self.reject(
                field,
                Constraint::Range,
                format!("must be between {} and {}", range.start(), range.end()),
            );
            return None;
        }
        Some(number)
    }

    /// Finite number strictly greater than zero
    pub fn positive(&mut self, field: &str) -> Option<f64> {
        let number = self.finite(field)?;
        if number <= 0.0 {
            self.reject(field, Constraint::Range, "must be greater than 0");
            return None;
        }
        Some(number)
    }

    pub fn choice<L: Label>(&mut self, field: &str) -> Option<L> {
        let value = self.present(field)?;
        let Some(text) = value.as_str() else {
            self.reject(field, Constraint::Type, "must be text");
            return None;
        };
        let choice = L::from_label(text);
        if choice.is_none() {
            self.reject(
                field,
                Constraint::OneOf,
                format!("must be one of: {}", L::choices()),
            );
        }
        choice
    }

    /// Calendar date posted as YYYY-MM-DD
    pub fn date(&mut self, field: &str) -> Option<NaiveDate> {
        let value = self.present(field)?;
        let Some(text) = value.as_str() else {
            self.reject(field, Constraint::Type, "must be text");
            return None;
        };
        match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.reject(field, Constraint::Format, "must be a date in YYYY-MM-DD format");
                None
            }
        }
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }

    fn finite(&mut self, field: &str) -> Option<f64> {
        let value = self.present(field)?;
        let number = as_number(value);
        if number.is_none() {
            self.reject(field, Constraint::Type, "must be a number");
        }
        number
    }

    fn present(&mut self, field: &str) -> Option<&'a Value> {
        let fields: &'a Map<String, Value> = self.fields;
        match fields.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, Constraint::Required, "is required");
                None
            }
            Some(Value::String(text)) if text.trim().is_empty() => {
                self.reject(field, Constraint::Required, "is required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn reject(&mut self, field: &str, constraint: Constraint, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            constraint,
            message: message.into(),
        });
    }
}

// Largest magnitude at which every f64 with zero fraction is an exact i64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Value::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    if let Value::String(text) = value {
        if let Ok(i) = text.trim().parse::<i64>() {
            return Some(i);
        }
    }
    let number = as_number(value)?;
    (number.fract() == 0.0 && number.abs() <= MAX_EXACT_INTEGER).then(|| number as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::labels::Urgency;
    use serde_json::json;

    #[test]
    fn test_integer_coerces_form_strings() {
        let raw = json!({ "a": "45", "b": 45.0, "c": " 7 ", "d": 4.5, "e": "abc" });
        let mut form = Submission::new(&raw).unwrap();
        assert_eq!(form.integer("a", 0..=100), Some(45));
        assert_eq!(form.integer("b", 0..=100), Some(45));
        assert_eq!(form.integer("c", 0..=100), Some(7));
        assert_eq!(form.integer("d", 0..=100), None);
        assert_eq!(form.integer("e", 0..=100), None);

        let err = form.into_error();
        assert_eq!(err.constraint_for("d"), Some(Constraint::Type));
        assert_eq!(err.constraint_for("e"), Some(Constraint::Type));
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn test_missing_null_and_blank_are_required() {
        let raw = json!({ "b": null, "c": "  " });
        let mut form = Submission::new(&raw).unwrap();
        assert!(form.integer("a", 0..=1).is_none());
        assert!(form.number("b", 0.0..=1.0).is_none());
        assert!(form.choice::<Urgency>("c").is_none());

        let err = form.into_error();
        for field in ["a", "b", "c"] {
            assert_eq!(err.constraint_for(field), Some(Constraint::Required));
        }
    }

    #[test]
    fn test_numbers_reject_non_finite_and_out_of_range() {
        let raw = json!({ "nan": "NaN", "big": 36, "zero": 0, "ok": "0.5" });
        let mut form = Submission::new(&raw).unwrap();
        assert!(form.number("nan", 1.0..=35.0).is_none());
        assert!(form.number("big", 1.0..=35.0).is_none());
        assert!(form.positive("zero").is_none());
        assert_eq!(form.positive("ok"), Some(0.5));

        let err = form.into_error();
        assert_eq!(err.constraint_for("nan"), Some(Constraint::Type));
        assert_eq!(err.constraint_for("big"), Some(Constraint::Range));
        assert_eq!(err.constraint_for("zero"), Some(Constraint::Range));
    }

    #[test]
    fn test_count_and_date() {
        let raw = json!({ "visits": -1, "admissions": "12", "date": "2024-02-30", "day": "2024-03-05" });
        let mut form = Submission::new(&raw).unwrap();
        assert!(form.count("visits").is_none());
        assert_eq!(form.count("admissions"), Some(12));
        assert!(form.date("date").is_none());
        assert_eq!(form.date("day"), NaiveDate::from_ymd_opt(2024, 3, 5));

        let err = form.into_error();
        assert_eq!(err.constraint_for("visits"), Some(Constraint::Range));
        assert_eq!(err.constraint_for("date"), Some(Constraint::Format));
    }

    #[test]
    fn test_body_must_be_an_object() {
        assert!(Submission::new(&json!([1, 2])).is_err());
        let err = parse_body(b"{not json").unwrap_err();
        assert!(err.names("body"));
        assert_eq!(err.constraint_for("body"), Some(Constraint::Type));
    }

    #[test]
    fn test_display_lists_every_field() {
        let raw = json!({ "age": 0 });
        let mut form = Submission::new(&raw).unwrap();
        form.integer("age", 1..=120);
        form.choice::<Urgency>("urgency");
        let message = form.into_error().to_string();
        assert_eq!(
            message,
            "invalid input: age must be between 1 and 120; urgency is required"
        );
    }
}
