//! YAML file helpers shared by the renderers

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use crate::config::error::kind_of;

pub fn read_yaml(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading YAML file: {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML syntax: {}", path.display()))
}

/// Replace the contents of `path` with `value`.
pub fn write_yaml(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(value)?;
    fs::write(path, content).with_context(|| format!("Failed writing YAML file: {}", path.display()))
}

/// Set `value` at the dotted `path`, creating missing (or null) intermediate mappings.
pub fn set_path(doc: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        bail!("empty YAML path");
    };
    let mut node = doc;
    for (depth, key) in parents.iter().enumerate() {
        node = as_mapping(node, &path[..depth])?.entry(Value::from(*key)).or_insert(Value::Null);
    }
    as_mapping(node, parents)?.insert(Value::from(*last), value);
    Ok(())
}

fn as_mapping<'a>(node: &'a mut Value, at: &[&str]) -> Result<&'a mut Mapping> {
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    match node {
        Value::Mapping(map) => Ok(map),
        other => {
            let location = if at.is_empty() { "<root>".to_string() } else { at.join(".") };
            bail!("expected a mapping at '{}', found {}", location, kind_of(other))
        }
    }
}
