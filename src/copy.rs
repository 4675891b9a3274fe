//! Deep copy of a value with every function replaced by a placeholder string.
//!
//! The copy keeps numbers, strings, nulls and dates, recurses into nested
//! objects and arrays, and silently drops everything else (booleans,
//! undefined fields, symbols, bigints). Arrays come out as objects keyed by
//! their decimal indices. Cyclic input cannot be expressed by [`Value`], so
//! recursion depth is bounded by the nesting depth of the input.

use crate::config::DEFAULT_PLACEHOLDER;
use crate::result::{StubError, StubResult};
use crate::value::{Object, Value};

#[derive(Debug, Clone)]
pub struct DeepCopier {
    placeholder: String,
}

impl Default for DeepCopier {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl DeepCopier {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Copies an object-typed, non-null `target`.
    pub fn copy(&self, target: &Value) -> StubResult<Value> {
        let fields = object_fields(target)?;
        Ok(Value::Object(self.copy_fields(fields)))
    }

    fn copy_fields<'a>(&self, fields: impl Iterator<Item = (String, &'a Value)>) -> Object {
        fields
            .filter_map(|(k, v)| self.copy_field(v).map(|v| (k, v)))
            .collect()
    }

    fn copy_field(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Number(_) | Value::String(_) | Value::Null => Some(value.clone()),
            Value::Function(_) => Some(Value::String(self.placeholder.clone())),
            Value::Date(d) => Some(Value::Date(*d)),
            Value::Object(_) | Value::Array(_) => {
                // nested fields are objects already, no need to check again
                Some(Value::Object(self.copy_fields(own_fields(value))))
            }
            Value::Undefined | Value::Bool(_) | Value::Symbol(_) | Value::BigInt(_) => None,
        }
    }
}

/// Fails unless `target` is a non-null object, the only input the copier takes
pub(crate) fn ensure_object(target: &Value) -> StubResult<()> {
    match target {
        Value::Object(_) | Value::Array(_) | Value::Date(_) => Ok(()),
        Value::Null => Err(StubError::invalid_argument(
            "deep copy target must not be null",
        )),
        other => Err(StubError::invalid_argument(format!(
            "deep copy target must be an object, got {}",
            other.type_of()
        ))),
    }
}

pub(crate) fn object_fields(
    target: &Value,
) -> StubResult<Box<dyn Iterator<Item = (String, &Value)> + '_>> {
    ensure_object(target)?;
    Ok(own_fields(target))
}

/// Own enumerable fields in order; dates have none
pub(crate) fn own_fields(value: &Value) -> Box<dyn Iterator<Item = (String, &Value)> + '_> {
    match value {
        Value::Object(o) => Box::new(o.iter().map(|(k, v)| (k.clone(), v))),
        Value::Array(items) => Box::new(items.iter().enumerate().map(|(i, v)| (i.to_string(), v))),
        _ => Box::new(std::iter::empty()),
    }
}

/// Deep copy taking the placeholder as a dynamic value.
///
/// `placeholder` must be a string when given; the default placeholder is used otherwise.
pub fn deep_copy_replace_fn(target: &Value, placeholder: Option<&Value>) -> StubResult<Value> {
    let copier = match placeholder {
        None => DeepCopier::default(),
        Some(Value::String(p)) => DeepCopier::new(p.clone()),
        Some(other) => {
            return Err(StubError::invalid_argument(format!(
                "placeholder must be a string, got {}",
                other.type_of()
            )))
        }
    };

    copier.copy(target)
}
