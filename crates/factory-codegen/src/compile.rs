//! Declaration to wrapper compilation.
//!
//! Builds the formal and actual parameter lists for one eligible declaration,
//! collapses the option quadruple into a single `options` actual, and picks
//! the wrapper shape.

use tracing::warn;

use crate::config::Strictness;
use crate::error::CodegenError;
use crate::model::{ArgumentDescriptor, Declaration};
use crate::shapes::OPTION_ARGUMENTS;
use crate::trace::TraceFormatter;
use crate::types;
use crate::wrapper::{RequiresGrad, Wrapper, WrapperShape, OPTIONS_ACTUAL};

/// Upstream default spellings with a known target-language equivalent.
const DEFAULT_REWRITES: &[(&str, &str)] = &[("long", "at::kLong"), ("False", "false")];

/// Upstream default spellings that have no rewrite rule. Emitting these
/// verbatim produces code that refers to nonexistent names.
const UNRECOGNIZED_DEFAULTS: &[&str] = &[
    "True", "None", "float", "double", "half", "int", "short", "char", "byte", "bool",
];

/// Translate a default spelling. Returns `None` for spellings with no rule.
pub fn translate_default(spelling: &str) -> Option<&str> {
    if let Some((_, target)) = DEFAULT_REWRITES.iter().find(|(from, _)| *from == spelling) {
        return Some(*target);
    }
    if UNRECOGNIZED_DEFAULTS.contains(&spelling) {
        return None;
    }
    Some(spelling)
}

/// Replace the option quadruple in `actuals` with a single `options` entry.
///
/// The entry goes at the index `dtype` held before any removal. Returns
/// whether a collapse happened.
pub fn collapse_options(actuals: &mut Vec<String>) -> bool {
    let all_present = OPTION_ARGUMENTS
        .iter()
        .all(|name| actuals.iter().any(|actual| actual == name));
    if !all_present {
        return false;
    }

    let Some(index) = actuals.iter().position(|actual| actual == "dtype") else {
        return false;
    };
    actuals.retain(|actual| !OPTION_ARGUMENTS.contains(&actual.as_str()));
    let index = index.min(actuals.len());
    actuals.insert(index, OPTIONS_ACTUAL.to_string());
    true
}

/// Actual expression that seeds a `_like` result from its source tensor.
pub fn source_options_actual(source: &str) -> String {
    format!("{}.options().is_variable(false)", source)
}

pub struct FunctionCompiler<'a> {
    tracer: &'a dyn TraceFormatter,
    strictness: Strictness,
}

impl<'a> FunctionCompiler<'a> {
    pub fn new(tracer: &'a dyn TraceFormatter, strictness: Strictness) -> Self {
        Self { tracer, strictness }
    }

    /// Report a construct with no rewrite rule. Lenient mode logs and lets
    /// the text through.
    fn unrecognized(&self, error: CodegenError) -> Result<(), CodegenError> {
        match self.strictness {
            Strictness::Strict => Err(error),
            Strictness::Lenient => {
                warn!("passing through: {}", error);
                Ok(())
            }
        }
    }

    fn formal(&self, decl: &Declaration, arg: &ArgumentDescriptor) -> Result<String, CodegenError> {
        let ty = types::normalize(&arg.ty);
        if types::find_unqualified(&ty).is_some() {
            self.unrecognized(CodegenError::UnrecognizedType {
                function: decl.name.clone(),
                argument: arg.name.clone(),
                ty: ty.clone(),
            })?;
        }

        let Some(spelling) = arg.default.as_deref() else {
            return Ok(format!("{} {}", ty, arg.name));
        };
        let default = match translate_default(spelling) {
            Some(default) => default,
            None => {
                self.unrecognized(CodegenError::UnrecognizedDefault {
                    function: decl.name.clone(),
                    argument: arg.name.clone(),
                    default: spelling.to_string(),
                })?;
                spelling
            }
        };
        Ok(format!("{} {} = {}", ty, arg.name, default))
    }

    pub fn compile(&self, decl: &Declaration, aggregating: bool) -> Result<Wrapper, CodegenError> {
        let mut formals = Vec::with_capacity(decl.arguments.len());
        let mut actuals = Vec::with_capacity(decl.arguments.len() + 1);
        for arg in &decl.arguments {
            formals.push(self.formal(decl, arg)?);
            actuals.push(arg.name.clone());
        }

        if aggregating {
            // The options expression reads these parameters by name.
            for name in OPTION_ARGUMENTS {
                if decl.argument(name).is_none() {
                    self.unrecognized(CodegenError::MissingOptionArgument {
                        function: decl.name.clone(),
                        argument: name.to_string(),
                    })?;
                }
            }
        }

        collapse_options(&mut actuals);

        let requires_grad = if aggregating {
            RequiresGrad::FromOptions
        } else {
            RequiresGrad::Never
        };

        if decl.is_like() && !aggregating {
            let source = actuals.first().ok_or_else(|| CodegenError::MissingSourceTensor {
                function: decl.name.clone(),
            })?;
            let seeded = source_options_actual(source);
            actuals.push(seeded);
        }

        let shape = if aggregating {
            WrapperShape::Aggregating
        } else {
            WrapperShape::Plain
        };

        Ok(Wrapper {
            shape,
            name: decl.name.clone(),
            formals,
            actuals,
            requires_grad,
            trace: self.tracer.format_trace(decl),
        })
    }
}
