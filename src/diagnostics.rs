use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// calling an exported function without arguments failed
    FunctionCall,
    /// copying or serializing an object failed
    ObjectCopy,
}

/// Recoverable stub failure, reported instead of raised
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub export: String,
    pub package: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            DiagnosticKind::FunctionCall => write!(
                f,
                "failed to call `{}` from package `{}` without arguments, stubbed as empty function: {}",
                self.export, self.package, self.message
            ),
            DiagnosticKind::ObjectCopy => write!(
                f,
                "failed to stub object `{}` from package `{}`, stubbed as empty object: {}",
                self.export, self.package, self.message
            ),
        }
    }
}

pub trait Reporter {
    fn report(&self, diagnostic: Diagnostic);
}

/// Writes diagnostics to the log as warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

/// Keeps diagnostics in the order they were reported
#[derive(Debug, Default)]
pub struct CollectReporter {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    /// Drains everything reported so far
    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

impl Reporter for CollectReporter {
    fn report(&self, diagnostic: Diagnostic) {
        log::debug!("collected diagnostic: {diagnostic}");
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}
