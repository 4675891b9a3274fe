use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::result::{StubError, StubResult};
use crate::value::Value;

/// Options of a package stubbing run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StubPackagesOptions {
    pub outfile: PathBuf,
    #[serde(default, deserialize_with = "one_or_many")]
    pub dont_stub: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

impl StubPackagesOptions {
    pub fn is_excluded(&self, export: &str) -> bool {
        self.dont_stub.iter().any(|name| name == export)
    }
}

/// Checks options handed over as a dynamic value.
///
/// `outfile` must be a string; `dontStub` is optional and must be a string
/// or an array of strings.
pub fn stub_packages(options: &Value) -> StubResult<StubPackagesOptions> {
    let Value::Object(options) = options else {
        return Err(StubError::invalid_argument(format!(
            "stub options must be an object, got {}",
            options.type_of()
        )));
    };

    let outfile = match options.get("outfile") {
        Some(Value::String(path)) => PathBuf::from(path),
        Some(other) => {
            return Err(StubError::invalid_argument(format!(
                "outfile must be a string path, got {}",
                other.type_of()
            )))
        }
        None => return Err(StubError::invalid_argument("outfile is required")),
    };

    let dont_stub = match options.get("dontStub") {
        None | Some(Value::Undefined) => Vec::new(),
        Some(Value::String(name)) => vec![name.clone()],
        Some(Value::Array(names)) => names
            .iter()
            .enumerate()
            .map(|(i, name)| match name {
                Value::String(name) => Ok(name.clone()),
                other => Err(StubError::invalid_argument(format!(
                    "dontStub[{i}] must be a string, got {}",
                    other.type_of()
                ))),
            })
            .collect::<StubResult<Vec<_>>>()?,
        Some(other) => {
            return Err(StubError::invalid_argument(format!(
                "dontStub must be a string or an array of strings, got {}",
                other.type_of()
            )))
        }
    };

    Ok(StubPackagesOptions { outfile, dont_stub })
}
