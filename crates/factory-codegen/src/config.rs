//! Generator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, GenerateResult};

/// Name of the generated header and of its top-level template.
pub const DEFAULT_FILE_NAME: &str = "variable_factories.h";

/// How the compiler reacts to defaults and types it has no rewrite rule for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Reject the declaration.
    #[default]
    Strict,
    /// Emit the text verbatim and log a warning.
    Lenient,
}

/// Which trace formatter feeds the wrapper bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    #[default]
    Jit,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub strictness: Strictness,
    pub trace: TraceMode,
    /// File name of the generated header inside the output directory.
    pub output_file: String,
    /// File name of the top-level template inside the template directory.
    pub template_file: String,
    /// Leave the output untouched when its contents would not change.
    pub skip_unchanged: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Strict,
            trace: TraceMode::Jit,
            output_file: DEFAULT_FILE_NAME.to_string(),
            template_file: DEFAULT_FILE_NAME.to_string(),
            skip_unchanged: true,
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a YAML file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> GenerateResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> GenerateResult<Self> {
        let config: GeneratorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> GenerateResult<()> {
        check_file_name("output_file", &self.output_file)?;
        check_file_name("template_file", &self.template_file)?;
        Ok(())
    }
}

fn check_file_name(key: &str, value: &str) -> GenerateResult<()> {
    if value.is_empty() {
        return Err(GenerateError::InvalidConfig(format!("{} must not be empty", key)));
    }
    if value.contains(|c| c == '/' || c == '\\') {
        return Err(GenerateError::InvalidConfig(format!(
            "{} must be a bare file name, got '{}'",
            key, value
        )));
    }
    Ok(())
}
