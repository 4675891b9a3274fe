//! Stubbing a whole package's export set into one source text.

use itertools::Itertools;
use log::{info, warn};

use crate::diagnostics::Reporter;
use crate::generator::StubGenerator;
use crate::literal::quote;
use crate::result::{StubError, StubResult};
use crate::validate::StubPackagesOptions;
use crate::value::Value;

/// What to do with an export no generator exists for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnUnsupported {
    /// log it and leave it out of the module
    #[default]
    Skip,
    /// fail the whole package
    Abort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StubbedExport {
    pub name: String,
    /// literal ready to embed, strings are quoted here
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StubModule {
    pub package: String,
    pub exports: Vec<StubbedExport>,
    /// exports left out, either excluded by options or unsupported
    pub skipped: Vec<String>,
}

impl StubModule {
    pub fn get(&self, name: &str) -> Option<&StubbedExport> {
        self.exports.iter().find(|e| e.name == name)
    }

    /// Source which binds the stubs to `globalThis[<package>]` when evaluated
    pub fn render(&self) -> String {
        let header = format!("// generated stubs for package {}\n", quote(&self.package));
        if self.exports.is_empty() {
            return format!("{header}globalThis[{}] = {{}};\n", quote(&self.package));
        }

        let body = self
            .exports
            .iter()
            .map(|e| format!("  {}: {}", quote(&e.name), e.code.lines().join("\n  ")))
            .join(",\n");

        format!(
            "{header}globalThis[{}] = {{\n{body}\n}};\n",
            quote(&self.package)
        )
    }
}

pub struct PackageStubber<'g, R: Reporter> {
    generator: &'g StubGenerator<R>,
    on_unsupported: OnUnsupported,
}

impl<'g, R: Reporter> PackageStubber<'g, R> {
    pub fn new(generator: &'g StubGenerator<R>) -> Self {
        Self {
            generator,
            on_unsupported: OnUnsupported::default(),
        }
    }

    pub fn on_unsupported(mut self, policy: OnUnsupported) -> Self {
        self.on_unsupported = policy;
        self
    }

    /// Stubs every export of `package` not excluded by `options`.
    ///
    /// Recoverable failures only show up as diagnostics; an unsupported
    /// export is skipped or aborts the run depending on the policy.
    pub fn stub(
        &self,
        package: &str,
        exports: &[(String, Value)],
        options: &StubPackagesOptions,
    ) -> StubResult<StubModule> {
        let mut module = StubModule {
            package: package.to_string(),
            exports: Vec::new(),
            skipped: Vec::new(),
        };

        for (name, value) in exports {
            if options.is_excluded(name) {
                module.skipped.push(name.clone());
                continue;
            }

            match self.generator.generate(value, name, package) {
                Ok(code) => {
                    let code = match value {
                        Value::String(_) => quote(&code),
                        _ => code,
                    };
                    module.exports.push(StubbedExport {
                        name: name.clone(),
                        code,
                    });
                }
                Err(err @ StubError::MissingStubGenerator { .. })
                    if self.on_unsupported == OnUnsupported::Skip =>
                {
                    warn!("skipping export: {err}");
                    module.skipped.push(name.clone());
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "stubbed {} exports of package `{package}`, skipped {}",
            module.exports.len(),
            module.skipped.len()
        );
        Ok(module)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::StubConfig;
    use crate::diagnostics::CollectReporter;
    use crate::runtimes::quickjs::Runner;
    use crate::value::FunctionError;

    fn options(dont_stub: &[&str]) -> StubPackagesOptions {
        let _ = pretty_env_logger::try_init();
        StubPackagesOptions {
            outfile: PathBuf::from("stubs.js"),
            dont_stub: dont_stub.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn exports() -> Vec<(String, Value)> {
        vec![
            ("VERSION".to_string(), Value::from("1.2.3")),
            ("answer".to_string(), Value::from(42.0)),
            ("debug".to_string(), Value::Bool(false)),
            (
                "init".to_string(),
                Value::function("init", || Err(FunctionError::new("no config"))),
            ),
            (
                "defaults".to_string(),
                Value::object([("retries", Value::from(3.0))]),
            ),
            ("internal".to_string(), Value::Null),
        ]
    }

    #[test]
    fn test_skip_policy() {
        let g = StubGenerator::with_reporter(StubConfig::default(), CollectReporter::new());
        let module = PackageStubber::new(&g)
            .stub("cfg", &exports(), &options(&["internal"]))
            .unwrap();

        let names: Vec<_> = module.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["VERSION", "answer", "init", "defaults"]);
        assert_eq!(module.skipped, vec!["debug", "internal"]);
        assert_eq!(module.get("VERSION").unwrap().code, "\"1.2.3\"");
        assert_eq!(module.get("init").unwrap().code, "function() {}");
        assert_eq!(g.reporter().len(), 1);
    }

    #[test]
    fn test_abort_policy() {
        let g = StubGenerator::with_reporter(StubConfig::default(), CollectReporter::new());
        let err = PackageStubber::new(&g)
            .on_unsupported(OnUnsupported::Abort)
            .stub("cfg", &exports(), &options(&[]))
            .unwrap_err();
        assert!(matches!(err, StubError::MissingStubGenerator { .. }));
    }

    #[test]
    fn test_render_empty() {
        let module = StubModule {
            package: "empty".to_string(),
            exports: vec![],
            skipped: vec![],
        };
        assert_eq!(
            module.render(),
            "// generated stubs for package \"empty\"\nglobalThis[\"empty\"] = {};\n"
        );
    }

    #[test]
    fn test_rendered_module_evaluates() {
        let g = StubGenerator::with_reporter(StubConfig::default(), CollectReporter::new());
        let module = PackageStubber::new(&g)
            .stub("cfg", &exports(), &options(&[]))
            .unwrap();
        let source = module.render();

        let runner = Runner::init().unwrap();
        runner.run_script(&source).unwrap();
        let ok = runner
            .eval_value(
                r#"(() => {
                    const pkg = globalThis["cfg"];
                    return pkg.VERSION === "1.2.3"
                        && pkg.answer === 42
                        && pkg.internal === null
                        && typeof pkg.init === "function"
                        && pkg.defaults.retries === 3
                        && !("debug" in pkg);
                })()"#,
            )
            .unwrap();
        assert_eq!(ok, Value::Bool(true), "{source}");
    }
}
