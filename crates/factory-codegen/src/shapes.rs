//! Recognized calling conventions for tensor construction options.
//!
//! Each shape is the exact structural form of the `dtype`, `layout`,
//! `device`, `pin_memory` arguments as one family of factory declarations
//! spells them. The catalog is ordered; the first full match wins.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::model::ArgumentDescriptor;

/// Names of the option arguments, in shape order.
pub const OPTION_ARGUMENTS: [&str; 4] = ["dtype", "layout", "device", "pin_memory"];

/// Default used by nullable option arguments.
pub const NULLOPT: &str = "c10::nullopt";

/// Identifier of a recognized option shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeId {
    /// Required positional arguments, `pin_memory = False`.
    Positional,
    /// As [`ShapeId::Positional`], but keyword-only.
    KeywordOnly,
    /// Keyword-only, nullable, all defaulting to `c10::nullopt`.
    Nullable,
    /// Index-pair generators (`tril_indices`, `triu_indices`): nullable
    /// keyword-only with `dtype` defaulting to `long`.
    IndexPairs,
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeId::Positional => "positional",
            ShapeId::KeywordOnly => "keyword-only",
            ShapeId::Nullable => "nullable",
            ShapeId::IndexPairs => "index-pairs",
        };
        f.write_str(name)
    }
}

/// Templates for the four option arguments, in [`OPTION_ARGUMENTS`] order.
pub type OptionShape = [ArgumentDescriptor; 4];

fn base_shape() -> OptionShape {
    [
        ArgumentDescriptor::new("dtype", "ScalarType"),
        ArgumentDescriptor::new("layout", "Layout"),
        ArgumentDescriptor::new("device", "Device"),
        ArgumentDescriptor::new("pin_memory", "bool").with_default("False"),
    ]
}

fn build_catalog() -> IndexMap<ShapeId, OptionShape> {
    let positional = base_shape();
    let keyword_only = positional.clone().map(ArgumentDescriptor::kwarg_only);
    let nullable = keyword_only
        .clone()
        .map(|arg| arg.with_default(NULLOPT).nullable());
    let index_pairs = [
        ArgumentDescriptor::new("dtype", "ScalarType").with_default("long"),
        ArgumentDescriptor::new("layout", "Layout").with_default(NULLOPT),
        ArgumentDescriptor::new("device", "Device").with_default(NULLOPT),
        ArgumentDescriptor::new("pin_memory", "bool").with_default(NULLOPT),
    ]
    .map(|arg| arg.kwarg_only().nullable());

    IndexMap::from([
        (ShapeId::Positional, positional),
        (ShapeId::KeywordOnly, keyword_only),
        (ShapeId::Nullable, nullable),
        (ShapeId::IndexPairs, index_pairs),
    ])
}

/// The shape catalog, built once.
pub fn catalog() -> &'static IndexMap<ShapeId, OptionShape> {
    static CATALOG: OnceLock<IndexMap<ShapeId, OptionShape>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Match exactly four option arguments against the catalog.
pub fn match_shape(arguments: &[ArgumentDescriptor]) -> Option<ShapeId> {
    if arguments.len() != OPTION_ARGUMENTS.len() {
        return None;
    }
    catalog()
        .iter()
        .find(|(_, shape)| shape.iter().zip(arguments).all(|(want, got)| want == got))
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_ordered_shapes() {
        let ids: Vec<ShapeId> = catalog().keys().copied().collect();
        assert_eq!(
            ids,
            vec![
                ShapeId::Positional,
                ShapeId::KeywordOnly,
                ShapeId::Nullable,
                ShapeId::IndexPairs
            ]
        );
        for shape in catalog().values() {
            let names: Vec<&str> = shape.iter().map(|arg| arg.name.as_str()).collect();
            assert_eq!(names, OPTION_ARGUMENTS);
        }
    }

    #[test]
    fn matches_each_shape() {
        for (id, shape) in catalog() {
            assert_eq!(match_shape(shape), Some(*id));
        }
    }

    #[test]
    fn nullable_shape_details() {
        let nullable = &catalog()[&ShapeId::Nullable];
        assert!(nullable.iter().all(|arg| arg.is_nullable));
        assert!(nullable.iter().all(|arg| arg.kwarg_only == Some(true)));
        assert!(nullable
            .iter()
            .all(|arg| arg.default.as_deref() == Some(NULLOPT)));
    }

    #[test]
    fn index_pairs_default_to_long() {
        let shape = &catalog()[&ShapeId::IndexPairs];
        assert_eq!(shape[0].default.as_deref(), Some("long"));
        assert_eq!(shape[3].default.as_deref(), Some(NULLOPT));
    }

    #[test]
    fn near_misses_do_not_match() {
        let mut args = base_shape().to_vec();
        args[3].default = None;
        assert_eq!(match_shape(&args), None);

        let mut args = base_shape().to_vec();
        args[0].annotation = Some("a".to_string());
        assert_eq!(match_shape(&args), None);

        assert_eq!(match_shape(&base_shape()[..3]), None);
    }
}
