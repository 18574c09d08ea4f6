use super::{ConfigError, PlayConfig};
use crate::engine::VariableBag;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub fn load_play(path: &Path) -> Result<PlayConfig, ConfigError> {
    let play = PlayConfig::from_path(path)?;
    play.validate()?;
    Ok(play)
}

/// Loads a `name: value` YAML map into a variable bag. Scalar values are
/// rendered to strings; null and empty values are dropped (unset and empty
/// are equivalent to the engine).
pub fn load_variables(path: &Path) -> Result<VariableBag, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let entries: BTreeMap<String, Value> =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let mut bag = VariableBag::new();
    for (name, value) in entries {
        let rendered = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            _ => {
                return Err(ConfigError::Variables(format!(
                    "variable `{name}` must be a scalar value"
                )))
            }
        };
        bag.insert(name, rendered);
    }
    Ok(bag)
}
