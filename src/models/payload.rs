//! Field-by-field decoding of JSON request bodies.
//!
//! A value of the wrong JSON type is reported against its field with kind
//! `type`, the same way a failed validation rule is, instead of failing the
//! whole body.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

pub struct JsonFields {
    fields: Map<String, Value>,
    errors: ValidationErrors,
}

impl JsonFields {
    /// Request bodies must be JSON objects.
    pub fn new(body: Value) -> AppResult<Self> {
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                errors: ValidationErrors::new(),
            }),
            other => Err(AppError::MalformedRequest(format!(
                "Expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Decode `field`. Absent and `null` both give `None`.
    pub fn take<T: DeserializeOwned>(&mut self, field: &'static str, expected: &'static str) -> Option<T> {
        self.take_nullable(field, expected).flatten()
    }

    /// Decode `field`, keeping an explicit `null` (`Some(None)`) apart from
    /// an absent field (`None`).
    pub fn take_nullable<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        expected: &'static str,
    ) -> Option<Option<T>> {
        match self.fields.remove(field)? {
            Value::Null => Some(None),
            value => match serde_json::from_value(value.clone()) {
                Ok(decoded) => Some(Some(decoded)),
                Err(_) => {
                    self.errors.add(field, type_mismatch(field, expected, &value));
                    None
                }
            },
        }
    }

    /// Hand back `decoded` unless a field had the wrong type.
    pub fn finish<T>(self, decoded: T) -> AppResult<T> {
        if self.errors.is_empty() {
            Ok(decoded)
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

fn type_mismatch(field: &str, expected: &str, value: &Value) -> ValidationError {
    let mut error = ValidationError::new("type");
    error.message = Some(Cow::Owned(format!(
        "Cast to {} failed for value {} at path \"{}\"",
        expected, value, field
    )));
    error.add_param(Cow::Borrowed("value"), value);
    error
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
