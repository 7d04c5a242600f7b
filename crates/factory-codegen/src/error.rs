//! Generator errors

use std::path::PathBuf;

use thiserror::Error;

/// Per-declaration compilation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("{function}: argument '{argument}' has unrecognized default '{default}'")]
    UnrecognizedDefault {
        function: String,
        argument: String,
        default: String,
    },

    #[error("{function}: argument '{argument}' has type '{ty}' with an unqualified name")]
    UnrecognizedType {
        function: String,
        argument: String,
        ty: String,
    },

    #[error("{function}: aggregated options need a '{argument}' parameter")]
    MissingOptionArgument { function: String, argument: String },

    #[error("{function}: no source tensor argument to copy options from")]
    MissingSourceTensor { function: String },
}

/// Errors raised while loading inputs or writing the generated file.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template {template}: {message}")]
    Template { template: String, message: String },

    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("failed to compile declaration #{index}: {source}")]
    Codegen {
        index: usize,
        #[source]
        source: CodegenError,
    },
}

/// Result type for whole-run operations.
pub type GenerateResult<T> = std::result::Result<T, GenerateError>;
