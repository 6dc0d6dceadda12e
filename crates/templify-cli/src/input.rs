//! Loading context and data files, writing output.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::cli::DataFormat;

/// Reads a JSON or YAML document, picking the parser by file extension.
///
/// Files without a recognised extension are tried as JSON first, then YAML.
pub fn load_document(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display())),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display())),
        _ => serde_json::from_str(&content).or_else(|_| {
            serde_yaml::from_str(&content)
                .with_context(|| format!("{} is neither JSON nor YAML", path.display()))
        }),
    }
}

/// Loads the rendering context. No path means an empty object.
pub fn load_context(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Default::default()));
    };

    let context = load_document(path)?;
    if !context.is_object() {
        bail!(
            "context in {} must be a mapping at the top level",
            path.display()
        );
    }
    tracing::debug!(path = %path.display(), "loaded context");
    Ok(context)
}

/// Serializes rendered data in the requested format.
pub fn format_data(value: &Value, format: DataFormat) -> Result<String> {
    match format {
        DataFormat::Json => {
            let mut out = serde_json::to_string_pretty(value)?;
            out.push('\n');
            Ok(out)
        }
        DataFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

/// Writes output to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
