//! Leaf nodes: string, number, boolean, date, enum, literal and any.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::node::{Precheck, Schema, SchemaBase};
use crate::result::ValidationResult;
use crate::transform::parse_date;
use crate::value::Value;

/// Runs the presence check, then `check` on present values.
pub(crate) fn validate_present<F>(base: &SchemaBase, value: &Value, check: F) -> ValidationResult
where
    F: FnOnce(&Value, &mut Vec<String>),
{
    match base.precheck(value) {
        Precheck::Absent(result) => result,
        Precheck::Present(mut errors) => {
            check(value, &mut errors);
            ValidationResult::from_errors(errors)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    base: SchemaBase,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }
}

impl Schema for StringSchema {
    schema_base!("string");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            let Some(text) = value.as_str() else {
                errors.push("Value must be a string.".to_string());
                return;
            };
            // Lengths count characters, not bytes.
            let length = text.chars().count();
            if let Some(min) = self.min_length {
                if length < min {
                    errors.push(format!("String is too short. Minimum length is {min}."));
                }
            }
            if let Some(max) = self.max_length {
                if length > max {
                    errors.push(format!("String is too long. Maximum length is {max}."));
                }
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    base: SchemaBase,
    min: Option<f64>,
    max: Option<f64>,
    integer: bool,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }
}

impl Schema for NumberSchema {
    schema_base!("number");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            let number = match value {
                Value::Number(number) if !number.is_nan() => *number,
                _ => {
                    errors.push("Value must be a number.".to_string());
                    return;
                }
            };
            if let Some(min) = self.min {
                if number < min {
                    errors.push(format!("Number is too small. Minimum value is {min}."));
                }
            }
            if let Some(max) = self.max {
                if number > max {
                    errors.push(format!("Number is too large. Maximum value is {max}."));
                }
            }
            if self.integer && number.fract() != 0.0 {
                errors.push("Value must be an integer.".to_string());
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    base: SchemaBase,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Schema for BooleanSchema {
    schema_base!("boolean");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            if !matches!(value, Value::Bool(_)) {
                errors.push("Value must be a boolean.".to_string());
            }
        })
    }
}

/// Date instances within optional inclusive bounds.
///
/// With [`DateSchema::accept_strings`], RFC 3339 and `YYYY-MM-DD` strings
/// are parsed and checked as dates too. Compiled `date` definitions set it,
/// since JSON and YAML documents carry no date values.
#[derive(Debug, Clone, Default)]
pub struct DateSchema {
    base: SchemaBase,
    min: Option<DateTime<Utc>>,
    max: Option<DateTime<Utc>>,
    accept_strings: bool,
}

impl DateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest accepted date, inclusive.
    pub fn min(mut self, date: DateTime<Utc>) -> Self {
        self.min = Some(date);
        self
    }

    /// Latest accepted date, inclusive.
    pub fn max(mut self, date: DateTime<Utc>) -> Self {
        self.max = Some(date);
        self
    }

    pub fn accept_strings(mut self) -> Self {
        self.accept_strings = true;
        self
    }
}

impl Schema for DateSchema {
    schema_base!("date");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            let date = match value {
                Value::Date(date) => *date,
                Value::String(text) if self.accept_strings => match parse_date(text) {
                    Some(date) => date,
                    None => {
                        errors.push("Value must be a valid date.".to_string());
                        return;
                    }
                },
                _ => {
                    errors.push("Value must be a valid date.".to_string());
                    return;
                }
            };
            if let Some(min) = &self.min {
                if date < *min {
                    errors.push(format!(
                        "Date must be on or after {}.",
                        min.to_rfc3339_opts(SecondsFormat::Millis, true)
                    ));
                }
            }
            if let Some(max) = &self.max {
                if date > *max {
                    errors.push(format!(
                        "Date must be on or before {}.",
                        max.to_rfc3339_opts(SecondsFormat::Millis, true)
                    ));
                }
            }
        })
    }
}

/// Membership in a fixed list of allowed values. A list that contains null
/// makes the node nullable.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    base: SchemaBase,
    allowed: Vec<Value>,
}

impl EnumSchema {
    pub fn new<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
        let mut base = SchemaBase::default();
        base.set_nullable(allowed.contains(&Value::Null));
        Self { base, allowed }
    }

    pub fn allowed_values(&self) -> &[Value] {
        &self.allowed
    }
}

impl Schema for EnumSchema {
    schema_base!("enum");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            if !self.allowed.contains(value) {
                let listed: Vec<String> = self.allowed.iter().map(Value::to_string).collect();
                errors.push(format!("Value must be one of: {}.", listed.join(", ")));
            }
        })
    }
}

/// Exact match against one value. A null literal makes the node nullable.
#[derive(Debug, Clone)]
pub struct LiteralSchema {
    base: SchemaBase,
    literal: Value,
}

impl LiteralSchema {
    pub fn new(literal: impl Into<Value>) -> Self {
        let literal = literal.into();
        let mut base = SchemaBase::default();
        base.set_nullable(literal == Value::Null);
        Self { base, literal }
    }
}

impl Schema for LiteralSchema {
    schema_base!("literal");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            if value != &self.literal {
                errors.push(format!("Value must be exactly {}.", self.literal));
            }
        })
    }
}

/// Accepts any present value; only the shared flags and custom validations
/// apply.
#[derive(Debug, Clone, Default)]
pub struct AnySchema {
    base: SchemaBase,
}

impl AnySchema {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Schema for AnySchema {
    schema_base!("any");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |_, _| {})
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::node::SchemaExt;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn required_by_default() {
        let result = StringSchema::new().validate(&Value::Undefined);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Value is required."]);

        assert!(StringSchema::new().optional().validate(&Value::Undefined).is_valid);
        assert!(NumberSchema::new().required(false).validate(&Value::Undefined).is_valid);
    }

    #[test]
    fn null_rejected_unless_nullable() {
        let result = NumberSchema::new().validate(&Value::Null);
        assert_eq!(result.errors, vec!["Value cannot be null."]);

        let result = NumberSchema::new().nullable(true).validate(&Value::Null);
        assert!(result.is_valid);
    }

    #[test]
    fn custom_message_overrides_presence_errors() {
        let schema = StringSchema::new().message("name please");
        assert_eq!(schema.validate(&Value::Undefined).errors, vec!["name please"]);
        assert_eq!(schema.validate(&Value::Null).errors, vec!["name please"]);
        assert!(schema.validate(&Value::from(5)).has_error("Value must be a string."));
    }

    #[test]
    fn string_type_and_length() {
        let schema = StringSchema::new().min(2).max(4);
        assert!(schema.validate(&v(json!("abc"))).is_valid);
        assert!(schema.validate(&v(json!("a"))).has_error("Minimum length is 2."));
        assert!(schema.validate(&v(json!("abcde"))).has_error("Maximum length is 4."));
        assert_eq!(
            schema.validate(&v(json!(12))).errors,
            vec!["Value must be a string."]
        );
        assert!(schema.validate(&v(json!("äöü"))).is_valid);
    }

    #[test]
    fn number_range_and_integer() {
        let schema = NumberSchema::new().min(1.0).max(10.0).integer();
        assert!(schema.validate(&v(json!(5))).is_valid);
        assert!(schema.validate(&v(json!(0))).has_error("Minimum value is 1."));
        assert!(schema.validate(&v(json!(11))).has_error("Maximum value is 10."));
        assert!(schema.validate(&v(json!(2.5))).has_error("Value must be an integer."));
        assert_eq!(
            schema.validate(&v(json!("5"))).errors,
            vec!["Value must be a number."]
        );
        assert!(!schema.validate(&Value::Number(f64::NAN)).is_valid);
    }

    #[test]
    fn boolean_accepts_only_booleans() {
        let schema = BooleanSchema::new();
        assert!(schema.validate(&v(json!(false))).is_valid);
        assert!(schema.validate(&v(json!("true"))).has_error("Value must be a boolean."));
        assert!(schema.validate(&v(json!(1))).has_error("Value must be a boolean."));
    }

    #[test]
    fn date_requires_date_instance_and_inclusive_bounds() {
        let min = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let max = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let schema = DateSchema::new().min(min).max(max);

        assert!(schema.validate(&Value::Date(min)).is_valid);
        assert!(schema.validate(&Value::Date(max)).is_valid);
        let early = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        assert!(schema
            .validate(&Value::Date(early))
            .has_error("Date must be on or after 2024-01-01T00:00:00.000Z."));
        assert!(schema
            .validate(&v(json!("2024-03-01")))
            .has_error("Value must be a valid date."));
    }

    #[test]
    fn date_parses_strings_when_enabled() {
        let min = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let schema = DateSchema::new().min(min).accept_strings();

        assert!(schema.validate(&v(json!("2024-03-01"))).is_valid);
        assert!(schema.validate(&v(json!("2024-01-01T00:00:00Z"))).is_valid);
        assert!(schema
            .validate(&v(json!("2023-12-31T23:59:59Z")))
            .has_error("Date must be on or after 2024-01-01T00:00:00.000Z."));
        assert_eq!(
            schema.validate(&v(json!("next week"))).errors,
            vec!["Value must be a valid date."]
        );
        assert!(schema.validate(&v(json!(20240301))).has_error("Value must be a valid date."));
    }

    #[test]
    fn null_members_make_enum_and_literal_nullable() {
        let schema = EnumSchema::new([Value::from("on"), Value::Null]);
        assert!(schema.validate(&Value::Null).is_valid);
        assert!(schema.validate(&v(json!("on"))).is_valid);
        assert!(!schema.validate(&v(json!("off"))).is_valid);

        assert!(LiteralSchema::new(Value::Null).validate(&Value::Null).is_valid);
        assert!(!LiteralSchema::new(Value::Null).validate(&v(json!(0))).is_valid);
        assert!(LiteralSchema::new(0).validate(&Value::Null).has_error("Value cannot be null."));
    }

    #[test]
    fn enum_lists_allowed_values() {
        let schema = EnumSchema::new(["red", "green"]);
        assert!(schema.validate(&v(json!("red"))).is_valid);
        assert_eq!(
            schema.validate(&v(json!("blue"))).errors,
            vec!["Value must be one of: red, green."]
        );
    }

    #[test]
    fn literal_matches_exactly() {
        let schema = LiteralSchema::new("v1");
        assert!(schema.validate(&v(json!("v1"))).is_valid);
        assert!(schema.validate(&v(json!("v2"))).has_error("Value must be exactly v1."));
        assert!(!LiteralSchema::new(1).validate(&v(json!("1"))).is_valid);
    }

    #[test]
    fn any_only_applies_flags_and_custom_checks() {
        assert!(AnySchema::new().validate(&v(json!({"x": [1]}))).is_valid);
        assert!(!AnySchema::new().validate(&Value::Null).is_valid);

        let even = AnySchema::new().add_validation(
            |value| matches!(value, Value::Number(n) if n % 2.0 == 0.0),
            "Value must be even.",
        );
        assert!(even.validate(&v(json!(4))).is_valid);
        assert_eq!(even.validate(&v(json!(3))).errors, vec!["Value must be even."]);
        assert!(!even.validate(&Value::Undefined).has_error("even"));
    }

    #[test]
    fn custom_errors_come_before_type_errors() {
        let schema = StringSchema::new().add_validation(|_| false, "custom failed");
        assert_eq!(
            schema.validate(&v(json!(1))).errors,
            vec!["custom failed", "Value must be a string."]
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let schema = StringSchema::new().min(3);
        let value = v(json!("ab"));
        assert_eq!(schema.validate(&value), schema.validate(&value));
    }
}
