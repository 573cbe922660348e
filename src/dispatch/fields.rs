//! Typed access to the fields of a flat JSON request body
//!
//! Numbers may arrive as JSON numbers or as numeric strings (form posts send both).
//! A required field that is absent, `null` or an empty string is missing; a field that
//! is present but does not parse is invalid.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{CalcError, CalcResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(body: &'a Value) -> CalcResult<Self> {
        match body {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(CalcError::invalid("body", "expected a JSON object")),
        }
    }

    /// The raw value, or `None` when absent, null or blank
    fn present(&self, name: &str) -> Option<&'a Value> {
        match self.map.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }

    fn require(&self, name: &str) -> CalcResult<&'a Value> {
        self.present(name).ok_or_else(|| CalcError::MissingField(name.to_string()))
    }

    pub fn f64(&self, name: &str) -> CalcResult<f64> {
        to_f64(name, self.require(name)?)
    }

    pub fn f64_or(&self, name: &str, default: f64) -> CalcResult<f64> {
        Ok(self.opt_f64(name)?.unwrap_or(default))
    }

    pub fn opt_f64(&self, name: &str) -> CalcResult<Option<f64>> {
        self.present(name).map(|v| to_f64(name, v)).transpose()
    }

    /// Non-negative whole count; fractional input is truncated
    pub fn count(&self, name: &str) -> CalcResult<u32> {
        to_count(name, self.require(name)?)
    }

    pub fn count_or(&self, name: &str, default: u32) -> CalcResult<u32> {
        match self.present(name) {
            Some(v) => to_count(name, v),
            None => Ok(default),
        }
    }

    pub fn date(&self, name: &str) -> CalcResult<NaiveDate> {
        to_date(name, self.require(name)?)
    }

    pub fn opt_date(&self, name: &str) -> CalcResult<Option<NaiveDate>> {
        self.present(name).map(|v| to_date(name, v)).transpose()
    }

    pub fn string(&self, name: &str) -> CalcResult<String> {
        to_string(name, self.require(name)?)
    }

    pub fn opt_string(&self, name: &str) -> CalcResult<Option<String>> {
        self.present(name).map(|v| to_string(name, v)).transpose()
    }

    /// `true`, `"sim"` or `"true"`; anything else, including absence, is false
    pub fn flag(&self, name: &str) -> bool {
        match self.present(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "sim" | "true" | "s"),
            _ => false,
        }
    }

    /// Array field, empty when absent
    pub fn list(&self, name: &str) -> CalcResult<&'a [Value]> {
        match self.present(name) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(CalcError::invalid(name, "expected an array")),
        }
    }
}

fn to_f64(name: &str, value: &Value) -> CalcResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::invalid(name, format!("not a number: {}", value)))
}

fn to_count(name: &str, value: &Value) -> CalcResult<u32> {
    let number = to_f64(name, value)?;
    if number < 0.0 || number > u32::MAX as f64 {
        return Err(CalcError::invalid(name, format!("not a valid count: {}", number)));
    }
    Ok(number.trunc() as u32)
}

fn to_date(name: &str, value: &Value) -> CalcResult<NaiveDate> {
    let text = value
        .as_str()
        .ok_or_else(|| CalcError::invalid(name, "expected a YYYY-MM-DD date string"))?
        .trim();

    // Accept full ISO timestamps by their date part
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| CalcError::invalid(name, format!("{}: {}", text, e)))
}

fn to_string(name: &str, value: &Value) -> CalcResult<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(CalcError::invalid(name, "expected a string")),
    }
}
