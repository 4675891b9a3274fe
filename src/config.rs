use std::str::FromStr;

use envconfig::Envconfig;

use crate::result::StubError;

pub const DEFAULT_PLACEHOLDER: &str = "__pkgstub_function_placeholder__";
pub const DEFAULT_FUNCTION_CODE: &str = "function() {}";

/// How the object generator turns a value into literal text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectStrategy {
    /// single pass over the original value, functions are written inline
    #[default]
    Direct,
    /// deep copy with placeholders, json encoding, then placeholder rewrite
    CopyRewrite,
}

impl FromStr for ObjectStrategy {
    type Err = StubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "copy-rewrite" => Ok(Self::CopyRewrite),
            other => Err(StubError::invalid_argument(format!(
                "unknown object strategy `{other}`, expected `direct` or `copy-rewrite`"
            ))),
        }
    }
}

#[derive(Envconfig, Debug, Clone, PartialEq)]
pub struct StubConfig {
    /// marker written in place of functions by the deep copier
    #[envconfig(from = "STUB_PLACEHOLDER", default = "__pkgstub_function_placeholder__")]
    pub placeholder: String,
    /// code emitted for every stubbed function
    #[envconfig(from = "STUB_FUNCTION_CODE", default = "function() {}")]
    pub function_code: String,
    #[envconfig(from = "STUB_OBJECT_STRATEGY", default = "direct")]
    pub object_strategy: ObjectStrategy,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            function_code: DEFAULT_FUNCTION_CODE.to_string(),
            object_strategy: ObjectStrategy::Direct,
        }
    }
}

impl StubConfig {
    /// Reads the config from the environment, loading `.env` first if there is one
    pub fn from_env() -> Result<Self, envconfig::Error> {
        if let Err(err) = dotenvy::dotenv() {
            log::debug!("no .env loaded: {err}");
        }
        Self::init_from_env()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_function_code(mut self, code: impl Into<String>) -> Self {
        self.function_code = code.into();
        self
    }

    pub fn with_object_strategy(mut self, strategy: ObjectStrategy) -> Self {
        self.object_strategy = strategy;
        self
    }
}
