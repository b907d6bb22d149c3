use super::types::{RouteDef, TableEntry};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load a route table from a YAML or JSON file, preserving document order.
pub fn load_table(file_path: impl AsRef<Path>) -> Result<Vec<(String, RouteDef)>> {
    let file_path = file_path.as_ref();
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("reading route table {}", file_path.display()))?;
    parse_table(&content).with_context(|| format!("parsing route table {}", file_path.display()))
}

/// Parse a route table document. JSON parses through the same path, being a
/// YAML subset.
pub fn parse_table(content: &str) -> Result<Vec<(String, RouteDef)>> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content)?;
    let serde_yaml::Value::Mapping(mapping) = doc else {
        bail!("route table must be a mapping of route names to definitions");
    };
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let serde_yaml::Value::String(name) = key else {
            bail!("route table keys must be strings");
        };
        let entry: TableEntry =
            serde_yaml::from_value(value).with_context(|| format!("route {name:?}"))?;
        let def = match entry {
            TableEntry::Pattern(pattern) => RouteDef {
                pattern: Some(pattern),
                ..RouteDef::default()
            },
            TableEntry::Def(def) => def,
        };
        entries.push((name, def));
    }
    Ok(entries)
}
