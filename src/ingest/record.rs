/// Field-by-field validation of loosely structured provider records.
///
/// Provider payloads are known to omit fields, and occasionally encode
/// numbers as strings. A `RecordReader` walks one JSON record, returning
/// `Some` for each usable field and remembering a `RecordIssue` for each
/// required field that is missing or mistyped. The caller constructs its
/// entity only when `finish` reports no issues.

use serde_json::Value;

use crate::model::{Problem, RecordIssue};

pub(crate) struct RecordReader<'a> {
    record: &'a Value,
    issues: Vec<RecordIssue>,
}

impl<'a> RecordReader<'a> {
    pub fn new(record: &'a Value) -> Self {
        Self { record, issues: Vec::new() }
    }

    /// Looks up a nested field, e.g. `&["floodArea", "county"]`. JSON `null`
    /// counts as absent.
    pub fn lookup(&self, path: &[&str]) -> Option<&'a Value> {
        let mut current = self.record;
        for key in path {
            current = current.get(key)?;
        }
        if current.is_null() { None } else { Some(current) }
    }

    fn missing(&mut self, path: &[&str]) {
        self.issues.push(RecordIssue { field: path.join("."), problem: Problem::Missing });
    }

    fn invalid(&mut self, path: &[&str], reason: impl Into<String>) {
        self.issues.push(RecordIssue {
            field: path.join("."),
            problem: Problem::Invalid(reason.into()),
        });
    }

    /// Records `reason` against `path` without consulting the record.
    pub fn reject(&mut self, path: &[&str], reason: impl Into<String>) {
        self.invalid(path, reason);
    }

    // --- optional fields ----------------------------------------------------

    /// A string field; numbers are rendered as text. Anything else is absent.
    pub fn optional_str(&self, path: &[&str]) -> Option<String> {
        match self.lookup(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// A numeric field given either as a JSON number or a numeric string.
    pub fn optional_f64(&self, path: &[&str]) -> Option<f64> {
        as_f64(self.lookup(path)?)
    }

    // --- required fields ----------------------------------------------------

    pub fn required_str(&mut self, path: &[&str]) -> Option<String> {
        match self.lookup(path) {
            None => {
                self.missing(path);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                self.invalid(path, format!("expected text, got {}", kind(other)));
                None
            }
        }
    }

    pub fn required_f64(&mut self, path: &[&str]) -> Option<f64> {
        match self.lookup(path) {
            None => {
                self.missing(path);
                None
            }
            Some(v) => match as_f64(v) {
                Some(n) => Some(n),
                None => {
                    self.invalid(path, format!("expected a number, got {}", kind(v)));
                    None
                }
            },
        }
    }

    pub fn required_i64(&mut self, path: &[&str]) -> Option<i64> {
        match self.lookup(path) {
            None => {
                self.missing(path);
                None
            }
            Some(v) => match v.as_i64() {
                Some(n) => Some(n),
                None => {
                    self.invalid(path, format!("expected an integer, got {}", kind(v)));
                    None
                }
            },
        }
    }

    /// A small non-negative integer such as a severity level.
    pub fn required_u8(&mut self, path: &[&str]) -> Option<u8> {
        let n = self.required_i64(path)?;
        match u8::try_from(n) {
            Ok(v) => Some(v),
            Err(_) => {
                self.invalid(path, format!("{} is out of range", n));
                None
            }
        }
    }

    /// Returns the accumulated issues; empty means every required field
    /// was usable.
    pub fn finish(self) -> Vec<RecordIssue> {
        self.issues
    }
}

/// Finite numeric value of a JSON number or numeric string. `"NaN"` and
/// `"inf"` parse as floats but are not readings.
pub(crate) fn as_f64(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_lookup_and_null_is_absent() {
        let v = json!({ "floodArea": { "county": "Kent", "riverOrSea": null } });
        let reader = RecordReader::new(&v);
        assert_eq!(reader.optional_str(&["floodArea", "county"]).as_deref(), Some("Kent"));
        assert_eq!(reader.optional_str(&["floodArea", "riverOrSea"]), None);
        assert_eq!(reader.optional_str(&["nope", "county"]), None);
    }

    #[test]
    fn test_required_fields_accumulate_issues() {
        let v = json!({ "lat": "52.1", "long": "east", "label": ["a", "b"] });
        let mut reader = RecordReader::new(&v);
        assert_eq!(reader.required_f64(&["lat"]), Some(52.1));
        assert_eq!(reader.required_f64(&["long"]), None);
        assert_eq!(reader.required_str(&["@id"]), None);
        assert_eq!(reader.required_str(&["label"]), None);

        let issues = reader.finish();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["long", "@id", "label"]);
        assert_eq!(issues[1].problem, Problem::Missing);
        assert!(matches!(issues[0].problem, Problem::Invalid(_)));
    }

    #[test]
    fn test_non_finite_strings_are_not_numbers() {
        let v = json!({ "lat": "NaN", "long": "inf", "low": "-inf", "high": " 1.5 " });
        let mut reader = RecordReader::new(&v);
        assert_eq!(reader.required_f64(&["lat"]), None);
        assert_eq!(reader.required_f64(&["long"]), None);
        assert_eq!(reader.optional_f64(&["low"]), None);
        assert_eq!(reader.optional_f64(&["high"]), Some(1.5));

        let issues = reader.finish();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["lat", "long"]);
        assert!(issues.iter().all(|i| matches!(i.problem, Problem::Invalid(_))));
    }

    #[test]
    fn test_required_u8_range() {
        let v = json!({ "a": 2, "b": 300, "c": 2.5 });
        let mut reader = RecordReader::new(&v);
        assert_eq!(reader.required_u8(&["a"]), Some(2));
        assert_eq!(reader.required_u8(&["b"]), None);
        assert_eq!(reader.required_u8(&["c"]), None);
        assert_eq!(reader.finish().len(), 2);
    }
}
