//! Rendering of results for stdout

use crate::config::OutputFormat;
use monoscope_core::Dependent;
use std::path::PathBuf;

/// Render impacted modules. JSON is an array of `{name, path}` objects, or
/// of paths alone with `path_only`; text is one path per line.
pub fn render_modules(modules: &[Dependent], format: OutputFormat, path_only: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if path_only => {
            let paths: Vec<&PathBuf> = modules.iter().map(|m| &m.path).collect();
            Ok(serde_json::to_string(&paths)?)
        }
        OutputFormat::Json => Ok(serde_json::to_string(modules)?),
        OutputFormat::Text => Ok(lines(modules.iter().map(|m| &m.path))),
    }
}

/// Render changed directories.
pub fn render_paths(paths: &[PathBuf], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(paths)?),
        OutputFormat::Text => Ok(lines(paths.iter())),
    }
}

fn lines<'a>(paths: impl Iterator<Item = &'a PathBuf>) -> String {
    paths
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
