//! Stub code generation for exported values.
//!
//! [`StubGenerator::generate`] classifies a value into a closed set of
//! [`StubKind`]s and renders each kind as source text. Functions are probed
//! by calling them once without arguments and stubbing what they return;
//! that runs the exported code with whatever side effects it has, so only
//! point it at packages whose exports are safe to call. Failures of that
//! probe and of object rendering are reported through the generator's
//! [`Reporter`] and degrade to fallback literals.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::{ObjectStrategy, StubConfig};
use crate::copy::DeepCopier;
use crate::diagnostics::{Diagnostic, DiagnosticKind, LogReporter, Reporter};
use crate::literal::{iso_string, js_number, quote, to_pretty_text, LiteralWriter};
use crate::result::{StubError, StubResult};
use crate::rewrite::{quote_placeholder, rewrite_placeholders};
use crate::value::{StubFunction, Value, ValueKind};

pub const NULL_STUB: &str = "null";
pub const UNDEFINED_STUB: &str = "undefined";
pub const EMPTY_OBJECT_STUB: &str = "{}";

/// Classified view of a value, one variant per generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StubKind<'a> {
    Null,
    Function(&'a StubFunction),
    Object(&'a Value),
    Date(&'a DateTime<Utc>),
    String(&'a str),
    Number(f64),
    Undefined,
    Unsupported(ValueKind),
}

impl<'a> StubKind<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Undefined => Self::Undefined,
            Value::Function(f) => Self::Function(f),
            Value::Date(d) => Self::Date(d),
            Value::String(s) => Self::String(s),
            Value::Number(n) => Self::Number(*n),
            Value::Object(_) | Value::Array(_) => Self::Object(value),
            Value::Bool(_) | Value::Symbol(_) | Value::BigInt(_) => {
                Self::Unsupported(value.type_of())
            }
        }
    }
}

pub struct StubGenerator<R: Reporter = LogReporter> {
    config: StubConfig,
    reporter: R,
}

impl Default for StubGenerator<LogReporter> {
    fn default() -> Self {
        Self::new(StubConfig::default())
    }
}

impl StubGenerator<LogReporter> {
    pub fn new(config: StubConfig) -> Self {
        Self::with_reporter(config, LogReporter)
    }
}

impl<R: Reporter> StubGenerator<R> {
    pub fn with_reporter(config: StubConfig, reporter: R) -> Self {
        Self { config, reporter }
    }

    pub fn config(&self) -> &StubConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Source text standing in for `target`, exported as `name` by `package`.
    ///
    /// Strings come back raw, quoting them is up to the caller.
    pub fn generate(&self, target: &Value, name: &str, package: &str) -> StubResult<String> {
        let kind = StubKind::classify(target);
        debug!("stubbing `{name}` from `{package}` as {kind:?}");

        match kind {
            StubKind::Null => Ok(NULL_STUB.to_string()),
            StubKind::Function(f) => Ok(self.stub_function(f, name, package)),
            StubKind::Object(o) => Ok(self.stub_object(o, name, package)),
            StubKind::Date(d) => Ok(format!("new Date({})", quote(&iso_string(d)))),
            StubKind::String(s) => Ok(s.to_string()),
            StubKind::Number(n) => Ok(js_number(n)),
            StubKind::Undefined => Ok(UNDEFINED_STUB.to_string()),
            StubKind::Unsupported(kind) => Err(StubError::MissingStubGenerator {
                name: name.to_string(),
                package: package.to_string(),
                kind,
            }),
        }
    }

    /// Best-effort introspection: calls `f` once and stubs its return value
    fn stub_function(&self, f: &StubFunction, name: &str, package: &str) -> String {
        match f.invoke() {
            Ok(returned) => {
                let body = self.stub_object(&returned, name, package);
                format!("function() {{ return {body}; }}")
            }
            Err(err) => {
                self.reporter.report(Diagnostic {
                    kind: DiagnosticKind::FunctionCall,
                    export: name.to_string(),
                    package: package.to_string(),
                    message: err.to_string(),
                });
                self.config.function_code.clone()
            }
        }
    }

    fn stub_object(&self, target: &Value, name: &str, package: &str) -> String {
        match self.render_object(target) {
            Ok(text) => text,
            Err(err) => {
                self.reporter.report(Diagnostic {
                    kind: DiagnosticKind::ObjectCopy,
                    export: name.to_string(),
                    package: package.to_string(),
                    message: err.to_string(),
                });
                EMPTY_OBJECT_STUB.to_string()
            }
        }
    }

    fn render_object(&self, target: &Value) -> StubResult<String> {
        match self.config.object_strategy {
            ObjectStrategy::Direct => LiteralWriter::new(&self.config.function_code).render(target),
            ObjectStrategy::CopyRewrite => {
                let copy = DeepCopier::new(self.config.placeholder.as_str()).copy(target)?;
                let text = to_pretty_text(&copy)?;
                Ok(rewrite_placeholders(
                    &text,
                    Some(&quote_placeholder(&self.config.placeholder)),
                    Some(&self.config.function_code),
                ))
            }
        }
    }
}

/// Stubs `target` with the default config, logging diagnostics as warnings
pub fn generate_stub_js_code(target: &Value, name: &str, package: &str) -> StubResult<String> {
    StubGenerator::default().generate(target, name, package)
}
