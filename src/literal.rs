//! Rendering values as source literals.
//!
//! Two renderers live here. [`to_pretty_text`] is the generic json encoder
//! (`JSON.stringify(value, null, 2)` layout) used by the copy-then-rewrite
//! path. [`LiteralWriter`] walks the original value once and writes the same
//! layout with function code inline, so no placeholder ever reaches the text.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::copy::{object_fields, own_fields};
use crate::result::StubResult;
use crate::value::Value;

const INDENT: &str = "  ";
// integers above this lose precision as f64, leave them to the float formatter
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Undefined | Value::Function(_) | Value::Symbol(_) => {
                serializer.serialize_unit()
            }
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&iso_string(d)),
            Value::BigInt(b) => Err(S::Error::custom(format!(
                "bigint {b} can't be serialized"
            ))),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    if is_json_skipped(item) {
                        seq.serialize_element(&())?;
                    } else {
                        seq.serialize_element(item)?;
                    }
                }
                seq.end()
            }
            Value::Object(o) => {
                let fields: Vec<_> = o.iter().filter(|(_, v)| !is_json_skipped(v)).collect();
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

/// values `JSON.stringify` leaves out of objects (and turns into null inside arrays)
fn is_json_skipped(value: &Value) -> bool {
    matches!(
        value,
        Value::Undefined | Value::Function(_) | Value::Symbol(_)
    )
}

pub fn iso_string(d: &DateTime<Utc>) -> String {
    d.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// String as a double quoted literal with json escaping
pub fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Json text of `value` with two space indentation
pub fn to_pretty_text(value: &Value) -> StubResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Number the way javascript prints it
pub fn js_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // covers -0 too
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return format!("{n}");
    }

    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Writes object literals directly from the original value.
pub struct LiteralWriter<'a> {
    function_code: &'a str,
    out: String,
}

impl<'a> LiteralWriter<'a> {
    pub fn new(function_code: &'a str) -> Self {
        Self {
            function_code,
            out: String::new(),
        }
    }

    /// Renders an object-typed, non-null `target`, failing like the deep copier otherwise
    pub fn render(mut self, target: &Value) -> StubResult<String> {
        let fields = object_fields(target)?;
        self.write_object(fields, 0)?;
        Ok(self.out)
    }

    fn write_object<'v>(
        &mut self,
        fields: impl Iterator<Item = (String, &'v Value)>,
        depth: usize,
    ) -> StubResult<()> {
        let mut fields = fields.filter(|(_, v)| is_emitted(v)).peekable();
        if fields.peek().is_none() {
            self.out.push_str("{}");
            return Ok(());
        }

        self.out.push('{');
        for (i, (key, value)) in fields.enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push('\n');
            self.write_indent(depth + 1);
            write!(self.out, "{}: ", quote(&key))?;
            self.write_field(value, depth + 1)?;
        }
        self.out.push('\n');
        self.write_indent(depth);
        self.out.push('}');

        Ok(())
    }

    fn write_field(&mut self, value: &Value, depth: usize) -> StubResult<()> {
        match value {
            Value::Function(_) => self.out.push_str(self.function_code),
            Value::Object(_) | Value::Array(_) => self.write_object(own_fields(value), depth)?,
            // leaves go through the json encoder so both paths agree byte for byte
            leaf => self.out.push_str(&serde_json::to_string(leaf)?),
        }
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }
}

/// fields the deep copier keeps
fn is_emitted(value: &Value) -> bool {
    matches!(
        value,
        Value::Number(_)
            | Value::String(_)
            | Value::Null
            | Value::Function(_)
            | Value::Date(_)
            | Value::Object(_)
            | Value::Array(_)
    )
}
