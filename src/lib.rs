//! Stub generation for package exports.
//!
//! Takes a value exported by a package, replaces everything executable in
//! it with no-op functions and renders the result as javascript source, so
//! tests can load a behavior-free stand-in instead of the real package.
//!
//! ```ignore
//! let generator = StubGenerator::new(StubConfig::default());
//! let text = generator.generate(&value, "createClient", "http-client")?;
//! ```

pub mod config;
pub mod copy;
pub mod diagnostics;
pub mod generator;
pub mod literal;
pub mod package;
pub mod result;
pub mod rewrite;
pub mod runtimes;
pub mod validate;
pub mod value;

pub use config::{ObjectStrategy, StubConfig};
pub use copy::{deep_copy_replace_fn, DeepCopier};
pub use diagnostics::{CollectReporter, Diagnostic, DiagnosticKind, LogReporter, Reporter};
pub use generator::{generate_stub_js_code, StubGenerator, StubKind};
pub use package::{OnUnsupported, PackageStubber, StubModule};
pub use result::{StubError, StubResult};
pub use rewrite::rewrite_placeholders;
pub use validate::{stub_packages, StubPackagesOptions};
pub use value::{FunctionError, Object, StubFunction, Value, ValueKind};
