//! Variable Factory Generator
//!
//! Turns tensor factory declarations into a header of inline wrappers. Each
//! wrapper calls the underlying factory with variable-type dispatch disabled
//! and wraps the result as an autograd variable. When a declaration carries
//! the element type / layout / device / pinned-memory quadruple, the wrapper
//! folds those four parameters into a single options value.
//!
//! # Pipeline
//!
//! 1. [`model`] loads the declaration list.
//! 2. [`classify`] selects eligible declarations.
//! 3. [`compile`] builds formals, actuals and the wrapper shape, normalizing
//!    types through [`types`].
//! 4. [`wrapper`] renders each body; [`trace`] supplies tracer fragments.
//! 5. [`driver`] collects fragments in order and [`writer`] renders the
//!    top-level [`template`] to disk.

pub mod classify;
pub mod compile;
pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod shapes;
pub mod template;
pub mod trace;
pub mod types;
pub mod wrapper;
pub mod writer;

pub use config::{GeneratorConfig, Strictness, TraceMode};
pub use driver::{gen_variable_factories, GenerationReport, Generator};
pub use error::{CodegenError, GenerateError, GenerateResult};
pub use model::{load_declarations, ArgumentDescriptor, Declaration};
