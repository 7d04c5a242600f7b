//! Trace recording fragments.
//!
//! A wrapper body brackets the underlying call with code that records the
//! operation in an active tracer: the pre fragment registers the node and its
//! inputs, the post fragment attaches the outputs.

use crate::model::Declaration;
use crate::template::indent_lines;

/// Code emitted before and after the wrapped call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracePair {
    pub pre: String,
    pub post: String,
}

pub trait TraceFormatter {
    fn format_trace(&self, decl: &Declaration) -> TracePair;
}

/// Emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceFormatter for NoTrace {
    fn format_trace(&self, _decl: &Declaration) -> TracePair {
        TracePair::default()
    }
}

/// Records the call in the JIT tracer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JitTrace;

/// Name of the local holding the wrapped result in every wrapper body.
const RESULT_NAME: &str = "result";

impl JitTrace {
    /// Traced operator name: the public name without an in-place suffix.
    fn trace_name(decl: &Declaration) -> &str {
        let name = decl.api_name();
        name.strip_suffix('_').unwrap_or(name)
    }

    fn add_inputs(decl: &Declaration) -> Vec<String> {
        decl.arguments
            .iter()
            .map(|arg| format!("jit::tracer::addInputs(node, \"{0}\", {0});", arg.name))
            .collect()
    }

    fn add_outputs(decl: &Declaration) -> Vec<String> {
        if decl.returns.is_empty() {
            return vec![format!("jit::tracer::addOutput(node, {});", RESULT_NAME)];
        }
        decl.returns
            .iter()
            .map(|ret| format!("jit::tracer::addOutput(node, {});", ret.name))
            .collect()
    }
}

impl TraceFormatter for JitTrace {
    fn format_trace(&self, decl: &Declaration) -> TracePair {
        let pre = format!(
            "\
torch::jit::Node* node = nullptr;
std::shared_ptr<jit::tracer::TracingState> tracer_state;
if (jit::tracer::isTracing()) {{
  tracer_state = jit::tracer::getTracingState();
  at::Symbol op_name;
  op_name = jit::Symbol::fromQualString(\"aten::{name}\");
  node = tracer_state->graph->create(op_name, /*num_outputs=*/0);
  jit::tracer::recordSourceLocation(node);
{inputs}
  tracer_state->graph->insertNode(node);

  jit::tracer::setTracingState(nullptr);
}}
",
            name = Self::trace_name(decl),
            inputs = indent_lines("  ", &Self::add_inputs(decl)),
        );
        let post = format!(
            "\
if (tracer_state) {{
  jit::tracer::setTracingState(std::move(tracer_state));
{outputs}
}}
",
            outputs = indent_lines("  ", &Self::add_outputs(decl)),
        );
        TracePair { pre, post }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArgumentDescriptor;

    fn zeros() -> Declaration {
        Declaration::new("zeros")
            .with_argument(ArgumentDescriptor::new("size", "IntArrayRef"))
            .with_argument(ArgumentDescriptor::new("dtype", "ScalarType"))
    }

    #[test]
    fn records_inputs_in_argument_order() {
        let trace = JitTrace.format_trace(&zeros());
        let size = trace.pre.find("addInputs(node, \"size\", size)").unwrap();
        let dtype = trace.pre.find("addInputs(node, \"dtype\", dtype)").unwrap();
        assert!(size < dtype);
        assert!(trace.pre.contains("fromQualString(\"aten::zeros\")"));
        assert!(trace.post.contains("addOutput(node, result);"));
    }

    #[test]
    fn uses_declared_returns_and_uninplaced_name() {
        let mut decl = zeros().with_return("out", "Tensor");
        decl.api_name = Some("zero_".to_string());
        let trace = JitTrace.format_trace(&decl);
        assert!(trace.pre.contains("\"aten::zero\""));
        assert!(trace.post.contains("addOutput(node, out);"));
        assert!(!trace.post.contains("result"));
    }

    #[test]
    fn no_trace_is_empty() {
        assert_eq!(NoTrace.format_trace(&zeros()), TracePair::default());
    }
}
