//! Type spelling normalization.
//!
//! Declarations spell argument types relative to the tensor library's own
//! namespace (`Tensor`, `IntArrayRef`, `c10::optional<ScalarType>`). The
//! generated wrappers live in a different namespace, so every short name has
//! to be qualified before it is emitted.

/// Namespace prefix inserted in front of short type names.
pub const QUALIFIER: &str = "at::";

/// Optional-wrapped short names the generic qualifier cannot reach.
const OPTIONAL_ALIASES: &[(&str, &str)] = &[
    ("c10::optional<ScalarType>", "c10::optional<at::ScalarType>"),
    ("c10::optional<Layout>", "c10::optional<at::Layout>"),
    ("c10::optional<Device>", "c10::optional<at::Device>"),
];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset of the leading capitalized identifier, after an optional
/// `const` and whitespace. The identifier must be at least two characters.
fn leading_type_name(raw: &str) -> Option<usize> {
    let candidates = raw
        .strip_prefix("const")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(|rest| raw.len() - rest.trim_start().len())
        .into_iter()
        .chain(std::iter::once(0));

    for start in candidates {
        let mut chars = raw[start..].chars();
        let first = chars.next();
        let second = chars.next();
        if first.is_some_and(|c| c.is_ascii_uppercase()) && second.is_some_and(is_word_char) {
            return Some(start);
        }
    }
    None
}

/// Qualify a leading short type name, keeping any `const ` prefix and any
/// trailing text verbatim. Lowercase and already-qualified spellings pass
/// through unchanged.
pub fn qualify(raw: &str) -> String {
    match leading_type_name(raw) {
        Some(index) => format!("{}{}{}", &raw[..index], QUALIFIER, &raw[index..]),
        None => raw.to_string(),
    }
}

/// Rewrite the known optional-of-short-name spellings.
pub fn fix_optional_alias(ty: &str) -> String {
    OPTIONAL_ALIASES
        .iter()
        .find(|(short, _)| *short == ty)
        .map(|(_, qualified)| (*qualified).to_string())
        .unwrap_or_else(|| ty.to_string())
}

/// Full normalization applied to every argument type.
pub fn normalize(raw: &str) -> String {
    fix_optional_alias(&qualify(raw))
}

/// First capitalized identifier in `ty` that is not preceded by `::`.
///
/// After [`normalize`], any such name would be looked up in the wrong
/// namespace by the generated code.
pub fn find_unqualified(ty: &str) -> Option<&str> {
    let mut start = None;
    for (index, c) in ty.char_indices().chain(std::iter::once((ty.len(), ' '))) {
        match (start, is_word_char(c)) {
            (None, true) => start = Some(index),
            (Some(begin), false) => {
                start = None;
                let word = &ty[begin..index];
                let qualified = ty[..begin].ends_with("::");
                if !qualified && word.starts_with(|c: char| c.is_ascii_uppercase()) {
                    return Some(word);
                }
            }
            _ => {}
        }
    }
    None
}
