//! Settings file (`.monoscope.toml`) and CLI overrides

use anyhow::{Context, bail};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Settings file looked up at the repository root.
pub const CONFIG_FILE: &str = ".monoscope.toml";

/// Go sources plus the module files themselves.
pub const DEFAULT_PATTERN: &str = r"^.*(\.go|go\.mod|go\.sum)$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Regex a changed file's path must match to count.
    pub pattern: String,
    /// Leading path segments kept when mapping files to directories.
    pub depth: usize,
    pub format: OutputFormat,
    /// Report the repository root as a module when it has its own go.mod.
    pub include_root_module: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pattern: DEFAULT_PATTERN.to_string(),
            depth: 1,
            format: OutputFormat::Json,
            include_root_module: true,
        }
    }
}

impl Settings {
    /// Load settings from `explicit`, or from `root/.monoscope.toml` if it
    /// exists. Without either, the defaults apply.
    pub fn load(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = root.join(CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Settings::default());
                }
                path
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        tracing::debug!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line values on top of the loaded settings.
    pub fn with_overrides(
        mut self,
        depth: Option<usize>,
        pattern: Option<String>,
        format: Option<OutputFormat>,
    ) -> anyhow::Result<Self> {
        if let Some(depth) = depth {
            self.depth = depth;
        }
        if let Some(pattern) = pattern {
            self.pattern = pattern;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn regex(&self) -> anyhow::Result<Regex> {
        Regex::new(&self.pattern).with_context(|| format!("invalid file pattern {:?}", self.pattern))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.depth == 0 {
            bail!("depth must be at least 1");
        }
        self.regex()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path(), None).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.regex().unwrap().is_match("svc/go.sum"));
        assert!(!settings.regex().unwrap().is_match("svc/README.md"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "depth = 2\nformat = \"text\"\n").unwrap();

        let settings = Settings::load(dir.path(), None).unwrap();
        assert_eq!(settings.depth, 2);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.pattern, DEFAULT_PATTERN);
        assert!(settings.include_root_module);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(dir.path(), Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Settings::from_toml("depth = 0\n").is_err());
        assert!(Settings::from_toml("pattern = \"(\"\n").is_err());
        assert!(Settings::from_toml("colour = true\n").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::default()
            .with_overrides(Some(3), Some(r"\.proto$".to_string()), Some(OutputFormat::Text))
            .unwrap();
        assert_eq!(settings.depth, 3);
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(settings.regex().unwrap().is_match("api/v1/service.proto"));

        assert!(Settings::default().with_overrides(Some(0), None, None).is_err());
    }
}
