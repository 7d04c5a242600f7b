//! Generated file output.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{GenerateError, GenerateResult};
use crate::template::{CodeTemplate, TemplateEnv, TemplateValue};

/// Placeholder receiving the generated wrapper definitions.
pub const FUNCTION_DEFINITIONS: &str = "function_definitions";

/// Placeholder receiving the provenance line.
pub const GENERATED_COMMENT: &str = "generated_comment";

const BUILTIN_TEMPLATE_NAME: &str = "templates/variable_factories.h";
const BUILTIN_TEMPLATE: &str = include_str!("../templates/variable_factories.h");

/// The top-level template shipped with the crate.
pub fn builtin_template() -> CodeTemplate {
    CodeTemplate::new(BUILTIN_TEMPLATE_NAME, BUILTIN_TEMPLATE)
}

/// SHA-256 of the rendered output, hex encoded.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Outcome of a single write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub digest: String,
    pub bytes: usize,
    /// False when the file already held identical content and was left alone.
    pub written: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Writer {
    pub skip_unchanged: bool,
}

impl Default for Writer {
    fn default() -> Self {
        Self {
            skip_unchanged: true,
        }
    }
}

impl Writer {
    /// Render `template` with `env` and write it to `out_dir/file_name`.
    ///
    /// `generated_comment` is bound to the template's provenance unless `env`
    /// already provides it.
    pub fn write(
        &self,
        out_dir: &Path,
        file_name: &str,
        template: &CodeTemplate,
        env: &TemplateEnv,
    ) -> GenerateResult<WriteReport> {
        let mut env = env.clone();
        if !env.contains_key(GENERATED_COMMENT) {
            env.insert(
                GENERATED_COMMENT.to_string(),
                TemplateValue::Str(format!("@generated from {}", template.name())),
            );
        }
        let content = template.substitute(&env)?;
        let digest = content_digest(&content);
        let path = out_dir.join(file_name);

        if self.skip_unchanged && fs::read_to_string(&path).is_ok_and(|old| old == content) {
            debug!("{} unchanged, skipping write", path.display());
            return Ok(WriteReport {
                path,
                digest,
                bytes: content.len(),
                written: false,
            });
        }

        fs::create_dir_all(out_dir).map_err(|source| GenerateError::Write {
            path: out_dir.to_path_buf(),
            source,
        })?;
        fs::write(&path, &content).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {} ({} bytes)", path.display(), content.len());

        Ok(WriteReport {
            path,
            digest,
            bytes: content.len(),
            written: true,
        })
    }
}

/// Ensure a top-level template can receive the generated definitions.
pub fn check_template(template: &CodeTemplate) -> GenerateResult<()> {
    if template.placeholders().contains(&FUNCTION_DEFINITIONS) {
        Ok(())
    } else {
        Err(GenerateError::Template {
            template: template.name().to_string(),
            message: format!("missing ${{{}}} placeholder", FUNCTION_DEFINITIONS),
        })
    }
}
