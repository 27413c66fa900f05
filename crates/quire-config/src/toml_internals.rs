use quire_error::ext::ResultExt;
use quire_error::Result;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Could not parse TOML file")]
pub struct TomlError;

pub fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, TomlError> {
    let source = std::fs::read_to_string(path)
        .change_context(TomlError)
        .attach_printable_lazy(|| format!("could not read {}", path.display()))?;

    parse_str(&source).attach_printable_lazy(|| format!("invalid config file: {}", path.display()))
}

pub fn parse_str<T: DeserializeOwned>(source: &str) -> Result<T, TomlError> {
    toml_edit::de::from_str(source).change_context(TomlError)
}
