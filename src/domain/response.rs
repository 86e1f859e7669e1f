use crate::error::{PaysafecardError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const RESULT_CODE: &str = "resultCode";
pub const ERROR_CODE: &str = "errorCode";
pub const MID: &str = "mid";

#[derive(Error, Debug)]
#[error("expected a mapping above `{0}`, found {1}")]
pub struct NotAMapping(String, &'static str);

#[derive(Error, Debug)]
#[error("`{0}` is not an integer code")]
pub struct NotACode(String);

#[derive(Error, Debug)]
#[error("`{0}` is not text")]
pub struct NotText(String);

/// Walks `path` through nested mappings, failing on the first segment that
/// cannot be followed.
pub fn descend<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = value;
    for key in path {
        let map = current.as_object().ok_or_else(|| {
            PaysafecardError::unpack_with(*key, NotAMapping(key.to_string(), kind(current)))
        })?;
        current = map.get(*key).ok_or_else(|| PaysafecardError::unpack(*key))?;
    }
    Ok(current)
}

/// Reads an integer code stored either as a number or as numeric text.
pub fn code(record: &Value, key: &str) -> Result<i64> {
    let raw = descend(record, &[key])?;
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| PaysafecardError::unpack_with(key, NotACode(raw.to_string())))
}

/// Reads a textual field, accepting numbers as their decimal rendering.
pub fn text(record: &Value, key: &str) -> Result<String> {
    match descend(record, &[key])? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(PaysafecardError::unpack_with(key, NotText(other.to_string()))),
    }
}

/// Result and error code of one remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultCodes {
    pub result_code: i64,
    pub error_code: i64,
}

impl ResultCodes {
    pub fn read(record: &Value) -> Result<Self> {
        Ok(Self {
            result_code: code(record, RESULT_CODE)?,
            error_code: code(record, ERROR_CODE)?,
        })
    }

    pub fn is_success(&self) -> bool {
        self.result_code == 0 && self.error_code == 0
    }
}

/// Outcome of a status query: the two codes plus every field the provider
/// returned, in the order received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    #[serde(skip)]
    pub codes: ResultCodes,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StatusRecord {
    pub fn from_value(record: &Value) -> Result<Self> {
        let codes = ResultCodes::read(record)?;
        let fields = record.as_object().cloned().unwrap_or_default();
        Ok(Self { codes, fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn mid(&self) -> Option<&str> {
        self.get(MID).and_then(Value::as_str)
    }

    pub fn serial_numbers(&self) -> Option<&str> {
        self.get("serialNumbers").and_then(Value::as_str)
    }

    pub fn disposition_state(&self) -> Option<&str> {
        self.get("dispositionState").and_then(Value::as_str)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
