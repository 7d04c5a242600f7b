//! Declaration records consumed by the generator.
//!
//! These mirror the factory entries produced by the upstream declaration
//! parser. Only the fields the generator reads are modelled; any other keys in
//! the source document are ignored during deserialization.

use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GenerateError, GenerateResult};

/// Marker in `method_of` identifying a free (namespace-level) function.
pub const NAMESPACE_MARKER: &str = "namespace";

/// Suffix of operations that derive their options from a source tensor.
pub const LIKE_SUFFIX: &str = "_like";

/// A single formal argument of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub is_nullable: bool,
    /// Textual default. `None` means the argument has no default at all.
    #[serde(default, deserialize_with = "default_spelling")]
    pub default: Option<String>,
    #[serde(default)]
    pub kwarg_only: Option<bool>,
    #[serde(default)]
    pub annotation: Option<String>,
}

impl ArgumentDescriptor {
    /// A required, positional, non-nullable argument.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_nullable: false,
            default: None,
            kwarg_only: None,
            annotation: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn kwarg_only(mut self) -> Self {
        self.kwarg_only = Some(true);
        self
    }
}

/// A returned value, used only when recording traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// One operation declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    /// Public name of the operation; falls back to `name` when absent.
    #[serde(default)]
    pub api_name: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDescriptor>,
    #[serde(default)]
    pub method_of: IndexSet<String>,
    #[serde(default)]
    pub returns: Vec<ReturnDescriptor>,
}

impl Declaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_name: None,
            arguments: Vec::new(),
            method_of: IndexSet::new(),
            returns: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_method_of(mut self, owner: impl Into<String>) -> Self {
        self.method_of.insert(owner.into());
        self
    }

    pub fn with_return(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.returns.push(ReturnDescriptor {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn api_name(&self) -> &str {
        self.api_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_namespace_fn(&self) -> bool {
        self.method_of.contains(NAMESPACE_MARKER)
    }

    pub fn is_like(&self) -> bool {
        self.name.ends_with(LIKE_SUFFIX)
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

/// Normalizes a YAML/JSON scalar default into the spelling the upstream
/// parser emits: strings verbatim, booleans as `True`/`False`, null as `None`.
fn default_spelling<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    let spelling = match value {
        serde_yaml::Value::Null => "None".to_string(),
        serde_yaml::Value::Bool(true) => "True".to_string(),
        serde_yaml::Value::Bool(false) => "False".to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s,
        other => {
            return Err(serde::de::Error::custom(format!(
                "unsupported default value: {:?}",
                other
            )));
        }
    };
    Ok(Some(spelling))
}

/// Where a declaration list is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Yaml,
    Json,
}

impl DeclarationFormat {
    /// Infer the format from a file extension. Anything that is not `.json`
    /// is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or("");

        if ext.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// Parse a declaration list from text.
pub fn parse_declarations(source: &str, format: DeclarationFormat) -> GenerateResult<Vec<Declaration>> {
    match format {
        DeclarationFormat::Yaml => Ok(serde_yaml::from_str(source)?),
        DeclarationFormat::Json => Ok(serde_json::from_str(source)?),
    }
}

/// Load a declaration list from disk.
pub fn load_declarations(path: impl AsRef<Path>) -> GenerateResult<Vec<Declaration>> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| GenerateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_declarations(&source, DeclarationFormat::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_defaults_keep_upstream_spelling() {
        let yaml = r#"
- name: tril_indices
  method_of: [Type, namespace]
  arguments:
    - { name: row, type: int64_t }
    - { name: offset, type: int64_t, default: 0 }
    - { name: dtype, type: ScalarType, default: long, is_nullable: true, kwarg_only: true }
    - { name: pin_memory, type: bool, default: false }
    - { name: layout, type: Layout, default: ~ }
"#;
        let decls = parse_declarations(yaml, DeclarationFormat::Yaml).unwrap();
        assert_eq!(decls.len(), 1);
        let decl = &decls[0];

        assert_eq!(decl.argument("row").unwrap().default, None);
        assert_eq!(decl.argument("offset").unwrap().default.as_deref(), Some("0"));
        assert_eq!(decl.argument("dtype").unwrap().default.as_deref(), Some("long"));
        assert_eq!(decl.argument("dtype").unwrap().kwarg_only, Some(true));
        assert_eq!(
            decl.argument("pin_memory").unwrap().default.as_deref(),
            Some("False")
        );
        assert_eq!(decl.argument("layout").unwrap().default.as_deref(), Some("None"));
        assert!(decl.is_namespace_fn());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = r#"[{"name": "ones_like", "mode": "native", "method_of": ["namespace"],
            "arguments": [{"name": "self", "type": "const Tensor &", "dynamic_type": "Tensor"}]}]"#;
        let decls = parse_declarations(json, DeclarationFormat::Json).unwrap();
        assert_eq!(decls[0].arguments[0].ty, "const Tensor &");
        assert!(decls[0].is_like());
        assert_eq!(decls[0].api_name(), "ones_like");
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DeclarationFormat::from_path(Path::new("Declarations.yaml")),
            DeclarationFormat::Yaml
        );
        assert_eq!(
            DeclarationFormat::from_path(Path::new("decls.JSON")),
            DeclarationFormat::Json
        );
        assert_eq!(
            DeclarationFormat::from_path(Path::new("decls")),
            DeclarationFormat::Yaml
        );
    }
}
