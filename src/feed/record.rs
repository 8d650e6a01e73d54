use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use thiserror::Error;

/// Why a single raw record could not be normalized
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` has an unexpected shape")]
    InvalidField(&'static str),
}

/// Read-only typed view over one raw vendor record.
///
/// The feed addresses every field by a one/two-letter key and omits whatever
/// it has no value for, so all defaulting on absent keys lives here rather
/// than at the call sites.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    value: &'a Value,
}

impl<'a> RawRecord<'a> {
    pub fn new(value: &'a Value) -> Result<Self, RecordError> {
        if value.is_object() {
            Ok(Self { value })
        } else {
            Err(RecordError::NotAnObject)
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.value.get(key)
    }

    /// Integer passthrough; absent or non-numeric reads as 0.
    pub fn int(&self, key: &str) -> i64 {
        self.opt_int(key).unwrap_or(0)
    }

    pub fn opt_int(&self, key: &str) -> Option<i64> {
        self.get(key)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
    }

    pub fn require_int(&self, key: &'static str) -> Result<i64, RecordError> {
        self.opt_int(key).ok_or(RecordError::MissingField(key))
    }

    pub fn float(&self, key: &str) -> f64 {
        self.opt_float(key).unwrap_or(0.0)
    }

    pub fn opt_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// String passthrough; absent or non-string reads as "".
    pub fn text(&self, key: &str) -> String {
        self.opt_text(key).unwrap_or_default()
    }

    pub fn opt_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_owned)
    }

    pub fn require_text(&self, key: &'static str) -> Result<String, RecordError> {
        self.opt_text(key).ok_or(RecordError::MissingField(key))
    }

    /// Epoch-seconds timestamp. A zero or missing value falls back to the
    /// current wall clock (the feed sends 0 for fixtures without a
    /// scheduled start).
    pub fn timestamp(&self, key: &str) -> DateTime<Utc> {
        match self.opt_int(key) {
            Some(secs) if secs != 0 => Utc
                .timestamp_opt(secs, 0)
                .single()
                .unwrap_or_else(Utc::now),
            _ => Utc::now(),
        }
    }

    /// First element of a string array (the vendor's image path lists).
    pub fn first_text(&self, key: &str) -> Option<String> {
        self.get(key)?
            .as_array()?
            .first()?
            .as_str()
            .map(str::to_owned)
    }

    /// Optional nested sub-object. Absent, null, or empty reads as `None`.
    pub fn object(&self, key: &str) -> Option<RawRecord<'a>> {
        let value = self.get(key)?;
        let obj = value.as_object()?;
        if obj.is_empty() {
            None
        } else {
            Some(RawRecord { value })
        }
    }

    /// Nested array of objects. An absent key is an empty list; a present
    /// non-array value or a non-object element fails the record.
    pub fn entries(&self, key: &'static str) -> Result<Vec<RawRecord<'a>>, RecordError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| RawRecord::new(v).map_err(|_| RecordError::InvalidField(key)))
                .collect(),
            Some(_) => Err(RecordError::InvalidField(key)),
        }
    }
}
