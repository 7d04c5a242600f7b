//! Generation driver.
//!
//! Walks the declaration list in input order, compiles every eligible
//! declaration and hands the ordered fragments to the writer. The order of
//! fragments in the output equals the order of eligible declarations in the
//! input.

use std::path::Path;

use tracing::{debug, info};

use crate::classify::classify;
use crate::compile::FunctionCompiler;
use crate::config::{GeneratorConfig, TraceMode};
use crate::error::{GenerateError, GenerateResult};
use crate::model::Declaration;
use crate::template::{CodeTemplate, TemplateEnv, TemplateValue};
use crate::trace::{JitTrace, NoTrace, TraceFormatter};
use crate::writer::{self, WriteReport, Writer, FUNCTION_DEFINITIONS};

/// Compile every eligible declaration, in input order.
pub fn function_definitions(
    declarations: &[Declaration],
    compiler: &FunctionCompiler<'_>,
) -> GenerateResult<Vec<String>> {
    let mut definitions = Vec::new();
    for (index, decl) in declarations.iter().enumerate() {
        let class = classify(decl);
        if !class.is_eligible() {
            continue;
        }
        debug!(
            name = %decl.name,
            aggregating = class.is_option_aggregating(),
            shape = ?class.shape,
            "compiling wrapper"
        );
        let wrapper = compiler
            .compile(decl, class.is_option_aggregating())
            .map_err(|source| GenerateError::Codegen { index, source })?;
        definitions.push(wrapper.render());
    }
    Ok(definitions)
}

/// Summary of one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub declarations: usize,
    pub wrappers: usize,
    pub output: WriteReport,
}

pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> GenerateResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn tracer(&self) -> &'static dyn TraceFormatter {
        match self.config.trace {
            TraceMode::Jit => &JitTrace,
            TraceMode::None => &NoTrace,
        }
    }

    /// Top-level template from `template_dir`, or the built-in one.
    pub fn load_template(&self, template_dir: Option<&Path>) -> GenerateResult<CodeTemplate> {
        let template = match template_dir {
            Some(dir) => CodeTemplate::from_file(dir.join(&self.config.template_file))?,
            None => writer::builtin_template(),
        };
        writer::check_template(&template)?;
        Ok(template)
    }

    /// Compile the eligible declarations without writing anything.
    pub fn definitions(&self, declarations: &[Declaration]) -> GenerateResult<Vec<String>> {
        let compiler = FunctionCompiler::new(self.tracer(), self.config.strictness);
        function_definitions(declarations, &compiler)
    }

    /// Generate the header into `out_dir`.
    pub fn generate(
        &self,
        out_dir: &Path,
        declarations: &[Declaration],
        template_dir: Option<&Path>,
    ) -> GenerateResult<GenerationReport> {
        let template = self.load_template(template_dir)?;
        let definitions = self.definitions(declarations)?;
        let wrappers = definitions.len();
        info!(
            "Compiled {} wrappers from {} declarations",
            wrappers,
            declarations.len()
        );

        let mut env = TemplateEnv::new();
        env.insert(
            FUNCTION_DEFINITIONS.to_string(),
            TemplateValue::List(definitions),
        );
        let writer = Writer {
            skip_unchanged: self.config.skip_unchanged,
        };
        let output = writer.write(out_dir, &self.config.output_file, &template, &env)?;

        Ok(GenerationReport {
            declarations: declarations.len(),
            wrappers,
            output,
        })
    }
}

/// Generate `variable_factories.h` with the default configuration.
pub fn gen_variable_factories(
    out_dir: &Path,
    declarations: &[Declaration],
    template_dir: Option<&Path>,
) -> GenerateResult<GenerationReport> {
    Generator::new(GeneratorConfig::default())?.generate(out_dir, declarations, template_dir)
}
