//! Wrapper bodies.
//!
//! Every generated wrapper has one of two shapes. Both run the pre-trace
//! fragment, call the underlying factory with variable-type dispatch
//! disabled, wrap the result as an autograd variable, run the post-trace
//! fragment and return. The aggregating shape first builds a local `options`
//! value from the four option parameters.

use std::fmt;

use crate::template::indent_lines;
use crate::trace::TracePair;

/// Expression composing the aggregated options value from its parameters.
pub const OPTIONS_EXPR: &str =
    "at::TensorOptions().device(device).dtype(dtype).layout(layout).pinned_memory(pin_memory)";

/// Actual argument standing in for the collapsed option quadruple.
pub const OPTIONS_ACTUAL: &str = "options";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperShape {
    /// Calls straight through.
    Plain,
    /// Builds `options` from the option quadruple before the call.
    Aggregating,
}

/// Value passed as the result's `requires_grad` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiresGrad {
    FromOptions,
    Never,
}

impl fmt::Display for RequiresGrad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiresGrad::FromOptions => write!(f, "{}.requires_grad()", OPTIONS_ACTUAL),
            RequiresGrad::Never => f.write_str("false"),
        }
    }
}

/// A fully compiled wrapper, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    pub shape: WrapperShape,
    pub name: String,
    pub formals: Vec<String>,
    pub actuals: Vec<String>,
    pub requires_grad: RequiresGrad,
    pub trace: TracePair,
}

impl Wrapper {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pre = indent_lines("  ", &[&self.trace.pre]);
        let post = indent_lines("  ", &[&self.trace.post]);
        let call = format!(
            "  at::Tensor tensor = ([&]() {{\n    at::AutoNonVariableTypeMode non_var_type_mode(true);\n    return at::{}({});\n  }})();\n",
            self.name,
            self.actuals.join(", ")
        );
        let wrap = format!(
            "  at::Tensor result =\n    autograd::make_variable(std::move(tensor), /*requires_grad=*/{});\n",
            self.requires_grad
        );

        writeln!(f, "inline at::Tensor {}({}) {{", self.name, self.formals.join(", "))?;
        writeln!(f, "{}", pre)?;
        match self.shape {
            WrapperShape::Plain => {
                f.write_str(&call)?;
                f.write_str(&wrap)?;
            }
            WrapperShape::Aggregating => {
                writeln!(f)?;
                writeln!(f, "  auto {} = {};", OPTIONS_ACTUAL, OPTIONS_EXPR)?;
                writeln!(f)?;
                writeln!(f)?;
                f.write_str(&call)?;
                writeln!(f)?;
                f.write_str(&wrap)?;
            }
        }
        writeln!(f, "{}", post)?;
        writeln!(f, "  return result;")?;
        writeln!(f, "}}")
    }
}
