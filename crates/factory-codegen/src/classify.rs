//! Declaration classification.
//!
//! Decides which declarations get a wrapper and whether that wrapper folds
//! the option quadruple into one aggregated options value.
//!
//! The gate is a loose existence test: a declaration aggregates options when
//! its arguments contain one type from each of the four option slots, in any
//! position and under any argument name, using one of the four spellings in
//! [`OPTION_SPELLINGS`]. The structural catalog in [`crate::shapes`] is
//! reported alongside but does not gate generation.

use std::fmt;

use crate::model::{ArgumentDescriptor, Declaration};
use crate::shapes::{match_shape, ShapeId, OPTION_ARGUMENTS};

/// One spelling of the option quadruple's types: element type, layout,
/// device, pinned-memory flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpelling {
    pub label: &'static str,
    pub types: [&'static str; 4],
}

/// Spellings accepted by the option-aggregation gate, checked in order.
pub const OPTION_SPELLINGS: [OptionSpelling; 4] = [
    OptionSpelling {
        label: "optional",
        types: [
            "c10::optional<ScalarType>",
            "c10::optional<Layout>",
            "c10::optional<Device>",
            "c10::optional<bool>",
        ],
    },
    OptionSpelling {
        label: "optional-qualified",
        types: [
            "c10::optional<at::ScalarType>",
            "c10::optional<at::Layout>",
            "c10::optional<at::Device>",
            "c10::optional<bool>",
        ],
    },
    OptionSpelling {
        label: "plain",
        types: ["ScalarType", "Layout", "Device", "bool"],
    },
    OptionSpelling {
        label: "plain-qualified",
        types: ["at::ScalarType", "at::Layout", "at::Device", "bool"],
    },
];

impl OptionSpelling {
    fn is_present_in(&self, arguments: &[ArgumentDescriptor]) -> bool {
        self.types
            .iter()
            .all(|ty| arguments.iter().any(|arg| arg.ty == *ty))
    }
}

impl fmt::Display for OptionSpelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Everything the generator needs to know about one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub namespace_fn: bool,
    pub like: bool,
    /// First option spelling found among the arguments.
    pub option_spelling: Option<OptionSpelling>,
    /// Structural shape of the `dtype`/`layout`/`device`/`pin_memory`
    /// arguments, when all four exist and match the catalog.
    pub shape: Option<ShapeId>,
}

impl Classification {
    pub fn is_option_aggregating(&self) -> bool {
        self.option_spelling.is_some()
    }

    pub fn is_eligible(&self) -> bool {
        self.namespace_fn && (self.is_option_aggregating() || self.like)
    }
}

pub fn classify(decl: &Declaration) -> Classification {
    Classification {
        namespace_fn: decl.is_namespace_fn(),
        like: decl.is_like(),
        option_spelling: option_spelling(decl),
        shape: option_shape(decl),
    }
}

pub fn option_spelling(decl: &Declaration) -> Option<OptionSpelling> {
    OPTION_SPELLINGS
        .iter()
        .find(|spelling| spelling.is_present_in(&decl.arguments))
        .copied()
}

pub fn is_option_aggregating(decl: &Declaration) -> bool {
    option_spelling(decl).is_some()
}

pub fn is_eligible(decl: &Declaration) -> bool {
    decl.is_namespace_fn() && (is_option_aggregating(decl) || decl.is_like())
}

/// Slice out the named option arguments in catalog order and match them.
pub fn option_shape(decl: &Declaration) -> Option<ShapeId> {
    let arguments = OPTION_ARGUMENTS
        .iter()
        .map(|name| decl.argument(name).cloned())
        .collect::<Option<Vec<_>>>()?;
    match_shape(&arguments)
}

#[cfg(test)]
mod tests;
