use std::rc::Rc;

use chrono::DateTime;
use itertools::Itertools;
use log::debug;
use quickjs_rusty::serde::from_js;
use quickjs_rusty::Context;
use quickjs_rusty::ContextError;
use quickjs_rusty::ExecutionError;
use quickjs_rusty::JsFunction;
use quickjs_rusty::OwnedJsValue as JsValue;
use quickjs_rusty::ValueError;

use crate::value::{CallResult, FunctionError, Object, Value};

#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("error context: {0:?}")]
    ContextError(#[from] ContextError),
    #[error("error running: {0:?}")]
    ExecutionError(#[from] ExecutionError),
    #[error("error from serde: {0:?}")]
    SerdeError(#[from] quickjs_rusty::serde::Error),
    #[error("error value: {0:?}")]
    ValueError(#[from] ValueError),
    #[error("error converting js value: {0}")]
    ConversionError(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

const KIND_OF: &str = r#"(function (v) {
    if (v === null) return "null";
    if (v instanceof Date) return "date";
    if (Array.isArray(v)) return "array";
    return typeof v;
})"#;
const TIME_OF: &str = "(function (d) { return d.getTime(); })";
const NAME_OF: &str = r#"(function (f) { return typeof f.name === "string" ? f.name : ""; })"#;
const DESCRIBE: &str = r#"(function (v) {
    if (typeof v === "symbol") return v.description === undefined ? "" : v.description;
    return String(v);
})"#;

/// Helper functions evaluated once per context, used to inspect values
struct Bridge {
    kind_of: JsFunction,
    time_of: JsFunction,
    name_of: JsFunction,
    describe: JsFunction,
    // dropped last, every js handle above belongs to it
    context: Context,
}

impl Bridge {
    fn new(context: Context) -> RuntimeResult<Self> {
        let helper = |code: &str| -> RuntimeResult<JsFunction> {
            context
                .eval(code, false)?
                .try_into_function()
                .map_err(|err| {
                    RuntimeError::ConversionError(format!("helper is not a function: {err:?}"))
                })
        };

        Ok(Self {
            kind_of: helper(KIND_OF)?,
            time_of: helper(TIME_OF)?,
            name_of: helper(NAME_OF)?,
            describe: helper(DESCRIBE)?,
            context,
        })
    }

    fn apply(&self, helper: &JsFunction, value: &JsValue) -> RuntimeResult<JsValue> {
        Ok(helper.call(vec![value.clone()])?)
    }

    fn apply_string(&self, helper: &JsFunction, value: &JsValue) -> RuntimeResult<String> {
        Ok(self.apply(helper, value)?.to_string()?)
    }

    fn to_json(&self, value: &JsValue) -> RuntimeResult<serde_json::Value> {
        Ok(from_js(value.context(), value)?)
    }

    fn convert(self: &Rc<Self>, value: &JsValue) -> RuntimeResult<Value> {
        let kind = self.apply_string(&self.kind_of, value)?;

        let converted = match kind.as_str() {
            "undefined" => Value::Undefined,
            "null" => Value::Null,
            "boolean" => match self.to_json(value)? {
                serde_json::Value::Bool(b) => Value::Bool(b),
                other => return Err(unexpected("boolean", &other)),
            },
            "number" => match self.to_json(value)? {
                serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
                // NaN and infinities do not survive the trip through json
                _ => {
                    let text = self.apply_string(&self.describe, value)?;
                    Value::Number(text.parse().unwrap_or(f64::NAN))
                }
            },
            "string" => Value::String(value.to_string()?),
            "symbol" => {
                let description = self.apply_string(&self.describe, value)?;
                Value::Symbol(Some(description).filter(|d| !d.is_empty()))
            }
            "bigint" => Value::BigInt(self.apply_string(&self.describe, value)?),
            "date" => {
                let millis = match self.to_json(&self.apply(&self.time_of, value)?)? {
                    serde_json::Value::Number(n) => n.as_f64(),
                    _ => None,
                };
                let date = millis.and_then(|ms| DateTime::from_timestamp_millis(ms as i64));
                match date {
                    Some(date) => Value::Date(date),
                    None => return Err(RuntimeError::ConversionError("invalid date".to_string())),
                }
            }
            "function" => self.convert_function(value)?,
            "array" => Value::Array(self.fields(value)?.into_iter().map(|(_, v)| v).collect()),
            "object" => Value::Object(self.fields(value)?.into_iter().collect::<Object>()),
            other => {
                return Err(RuntimeError::ConversionError(format!(
                    "unknown value type {other}"
                )))
            }
        };

        Ok(converted)
    }

    fn fields(self: &Rc<Self>, value: &JsValue) -> RuntimeResult<Vec<(String, Value)>> {
        let o = value
            .clone()
            .try_into_object()
            .map_err(|err| RuntimeError::ConversionError(format!("not an object: {err:?}")))?;
        let properties = o
            .properties_iter()
            .map_err(|err| {
                RuntimeError::ConversionError(format!("can't list properties: {err:?}"))
            })?;

        let fields = properties
            .chunks(2)
            .into_iter()
            // properties come as key, value pairs, so chunks always hold two items
            .map(
                #[allow(clippy::unwrap_used)]
                |mut chunk| (chunk.next().unwrap(), chunk.next().unwrap()),
            )
            .map(|(k, p)| k.and_then(|k| p.map(|p| (k, p))))
            .filter_map(|m| m.ok())
            .map(|(k, p)| -> RuntimeResult<(String, Value)> {
                Ok((k.to_string()?, self.convert(&p)?))
            })
            .collect();

        fields
    }

    fn convert_function(self: &Rc<Self>, value: &JsValue) -> RuntimeResult<Value> {
        let name = self.apply_string(&self.name_of, value)?;
        let function = value
            .clone()
            .try_into_function()
            .map_err(|err| RuntimeError::ConversionError(format!("not a function: {err:?}")))?;

        let callable = JsCallable {
            function,
            bridge: Rc::clone(self),
        };
        Ok(Value::function(name, move || callable.call()))
    }
}

fn unexpected(expected: &str, got: &serde_json::Value) -> RuntimeError {
    RuntimeError::ConversionError(format!("expected {expected}, got {got}"))
}

/// Js function kept alive together with the context it came from
struct JsCallable {
    function: JsFunction,
    bridge: Rc<Bridge>,
}

impl JsCallable {
    fn call(&self) -> CallResult {
        let returned = self
            .function
            .call(Vec::new())
            .map_err(|err| FunctionError::new(exception_message(&err)))?;

        self.bridge
            .convert(&returned)
            .map_err(|err| FunctionError::new(err.to_string()))
    }
}

fn exception_message(err: &ExecutionError) -> String {
    match err {
        ExecutionError::Exception(value) => match value.to_string() {
            Ok(message) => message,
            Err(err) => format!("exception without message: {err:?}"),
        },
        other => format!("{other:?}"),
    }
}

/// QuickJS context which hands out evaluated values as [`Value`]s.
///
/// Everything is single threaded: converted functions call back into the
/// same context, which stays alive while any of them exists.
#[derive(Clone)]
pub struct Runner {
    bridge: Rc<Bridge>,
}

impl Runner {
    pub fn init() -> RuntimeResult<Self> {
        let context = Context::new(None)?;
        let bridge = Bridge::new(context)?;

        Ok(Runner {
            bridge: Rc::new(bridge),
        })
    }

    pub fn run_script(&self, content: &str) -> RuntimeResult<JsValue> {
        let val = self.bridge.context.eval(content, false)?;

        Ok(val)
    }

    /// Evaluates `content` and converts its completion value
    pub fn eval_value(&self, content: &str) -> RuntimeResult<Value> {
        let val = self.run_script(content)?;
        self.bridge.convert(&val)
    }

    /// Evaluates `content`, which must produce an object, as a package's exports
    pub fn eval_exports(&self, content: &str) -> RuntimeResult<Vec<(String, Value)>> {
        match self.eval_value(content)? {
            Value::Object(o) => {
                debug!("loaded {} exports", o.len());
                Ok(o.into_iter().collect())
            }
            other => Err(RuntimeError::ConversionError(format!(
                "exports must be an object, got {}",
                other.type_of()
            ))),
        }
    }
}
