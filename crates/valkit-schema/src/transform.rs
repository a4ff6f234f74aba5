//! Named value transforms referenced by declarative `transform` definitions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::value::Value;

/// Value mapping applied by a transform node before validation.
pub type TransformFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Lookup table from transform name to function.
///
/// [`TransformRegistry::default`] comes with `trim`, `lowercase`,
/// `uppercase`, `toNumber` and `toDate`. Values of other types pass through
/// the string transforms unchanged.
#[derive(Clone)]
pub struct TransformRegistry {
    transforms: HashMap<String, TransformFn>,
}

impl TransformRegistry {
    /// Registry with no transforms at all.
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Register (or replace) a transform under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.transforms.insert(name.into(), Arc::new(transform));
        self
    }

    pub fn get(&self, name: &str) -> Option<TransformFn> {
        self.transforms.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("trim", |value| Ok(map_string(value, |text| text.trim().to_string())))
            .register("lowercase", |value| Ok(map_string(value, str::to_lowercase)))
            .register("uppercase", |value| Ok(map_string(value, str::to_uppercase)))
            .register("toNumber", to_number)
            .register("toDate", to_date);
        registry
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn map_string(value: &Value, map: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(text) => Value::String(map(text)),
        other => other.clone(),
    }
}

fn to_number(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| format!("'{text}' is not a number")),
        other => Ok(other.clone()),
    }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
fn to_date(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(text) => parse_date(text)
            .map(Value::Date)
            .ok_or_else(|| format!("'{text}' is not a date")),
        other => Ok(other.clone()),
    }
}

pub(crate) fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn apply(name: &str, value: Value) -> Result<Value, String> {
        let registry = TransformRegistry::default();
        let transform = registry.get(name).expect("builtin transform");
        transform(&value)
    }

    #[test]
    fn string_builtins() {
        assert_eq!(apply("trim", Value::from("  a b ")), Ok(Value::from("a b")));
        assert_eq!(apply("lowercase", Value::from("AbC")), Ok(Value::from("abc")));
        assert_eq!(apply("uppercase", Value::from("AbC")), Ok(Value::from("ABC")));
        assert_eq!(apply("trim", Value::from(3)), Ok(Value::from(3)));
    }

    #[test]
    fn to_number_parses_or_fails() {
        assert_eq!(apply("toNumber", Value::from(" 42 ")), Ok(Value::from(42)));
        assert_eq!(
            apply("toNumber", Value::from("x1")),
            Err("'x1' is not a number".to_string())
        );
    }

    #[test]
    fn to_date_accepts_rfc3339_and_plain_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(apply("toDate", Value::from("2024-02-29")), Ok(Value::Date(expected)));
        assert_eq!(
            apply("toDate", Value::from("2024-02-29T02:00:00+02:00")),
            Ok(Value::Date(expected))
        );
        assert!(apply("toDate", Value::from("yesterday")).is_err());
    }

    #[test]
    fn custom_transforms_can_be_registered() {
        let mut registry = TransformRegistry::empty();
        registry.register("double", |value| match value {
            Value::Number(n) => Ok(Value::Number(n * 2.0)),
            _ => Err("not a number".to_string()),
        });
        assert!(registry.contains("double"));
        assert!(!registry.contains("trim"));
        assert_eq!(registry.names(), vec!["double"]);
    }
}
