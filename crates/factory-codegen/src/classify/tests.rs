use super::*;
use crate::model::{ArgumentDescriptor, Declaration, NAMESPACE_MARKER};
use crate::shapes::NULLOPT;

fn option_args(types: [&str; 4]) -> Vec<ArgumentDescriptor> {
    OPTION_ARGUMENTS
        .iter()
        .zip(types)
        .map(|(name, ty)| ArgumentDescriptor::new(*name, ty))
        .collect()
}

fn factory(name: &str, types: [&str; 4]) -> Declaration {
    let mut decl = Declaration::new(name)
        .with_method_of(NAMESPACE_MARKER)
        .with_argument(ArgumentDescriptor::new("size", "IntArrayRef"));
    decl.arguments.extend(option_args(types));
    decl
}

#[test]
fn each_spelling_enables_aggregation() {
    for spelling in OPTION_SPELLINGS {
        let decl = factory("empty", spelling.types);
        let class = classify(&decl);
        assert_eq!(class.option_spelling, Some(spelling), "{}", spelling);
        assert!(class.is_option_aggregating());
        assert!(class.is_eligible());
    }
}

#[test]
fn gate_ignores_argument_names_and_positions() {
    let decl = Declaration::new("full")
        .with_method_of(NAMESPACE_MARKER)
        .with_argument(ArgumentDescriptor::new("requires_grad", "bool"))
        .with_argument(ArgumentDescriptor::new("where", "Device"))
        .with_argument(ArgumentDescriptor::new("kind", "ScalarType"))
        .with_argument(ArgumentDescriptor::new("fmt", "Layout"));
    assert!(is_option_aggregating(&decl));
    assert_eq!(option_shape(&decl), None);
}

#[test]
fn mixed_spellings_do_not_aggregate() {
    let decl = factory(
        "empty",
        ["ScalarType", "c10::optional<Layout>", "Device", "bool"],
    );
    assert!(!is_option_aggregating(&decl));
    assert!(!is_eligible(&decl));
}

#[test]
fn methods_are_never_eligible() {
    let mut decl = factory("zeros", ["ScalarType", "Layout", "Device", "bool"]);
    decl.method_of.clear();
    decl.method_of.insert("Tensor".to_string());
    assert!(is_option_aggregating(&decl));
    assert!(!is_eligible(&decl));

    let like = Declaration::new("zeros_like")
        .with_method_of("Tensor")
        .with_argument(ArgumentDescriptor::new("self", "const Tensor &"));
    assert!(!is_eligible(&like));
}

#[test]
fn like_suffix_alone_is_eligible() {
    let decl = Declaration::new("randn_like")
        .with_method_of("Type")
        .with_method_of(NAMESPACE_MARKER)
        .with_argument(ArgumentDescriptor::new("self", "const Tensor &"));
    let class = classify(&decl);
    assert!(class.like);
    assert!(!class.is_option_aggregating());
    assert!(class.is_eligible());
}

#[test]
fn plain_namespace_function_is_skipped() {
    let decl = Declaration::new("add")
        .with_method_of(NAMESPACE_MARKER)
        .with_argument(ArgumentDescriptor::new("self", "const Tensor &"))
        .with_argument(ArgumentDescriptor::new("other", "const Tensor &"));
    assert!(!is_eligible(&decl));
}

#[test]
fn reports_structural_shape() {
    let mut decl = Declaration::new("tril_indices")
        .with_method_of(NAMESPACE_MARKER)
        .with_argument(ArgumentDescriptor::new("row", "int64_t"))
        .with_argument(ArgumentDescriptor::new("col", "int64_t"));
    decl.arguments.extend(
        [
            ArgumentDescriptor::new("dtype", "ScalarType").with_default("long"),
            ArgumentDescriptor::new("layout", "Layout").with_default(NULLOPT),
            ArgumentDescriptor::new("device", "Device").with_default(NULLOPT),
            ArgumentDescriptor::new("pin_memory", "bool").with_default(NULLOPT),
        ]
        .map(|arg| arg.kwarg_only().nullable()),
    );

    let class = classify(&decl);
    assert_eq!(class.shape, Some(ShapeId::IndexPairs));
    assert_eq!(class.option_spelling.map(|s| s.label), Some("plain"));
}
