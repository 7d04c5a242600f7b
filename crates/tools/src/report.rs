//! Classification report for a declaration list.

use std::fmt;

use factory_codegen::classify::{classify, Classification};
use factory_codegen::Declaration;

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub class: Classification,
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |flag: bool| if flag { "yes" } else { "no" };
        let spelling = self
            .class
            .option_spelling
            .map(|s| s.label.to_string())
            .unwrap_or_else(|| "-".to_string());
        let shape = self
            .class
            .shape
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{:<32} eligible={:<3} aggregating={:<3} spelling={:<18} shape={}",
            self.name,
            mark(self.class.is_eligible()),
            mark(self.class.is_option_aggregating()),
            spelling,
            shape
        )
    }
}

/// Classify `declarations`, keeping only eligible ones unless `all` is set.
pub fn classification_rows(declarations: &[Declaration], all: bool) -> Vec<ReportRow> {
    declarations
        .iter()
        .map(|decl| ReportRow {
            name: decl.name.clone(),
            class: classify(decl),
        })
        .filter(|row| all || row.class.is_eligible())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_codegen::model::NAMESPACE_MARKER;
    use factory_codegen::ArgumentDescriptor;

    fn declarations() -> Vec<Declaration> {
        vec![
            Declaration::new("add")
                .with_method_of(NAMESPACE_MARKER)
                .with_argument(ArgumentDescriptor::new("self", "const Tensor &")),
            Declaration::new("rand_like")
                .with_method_of(NAMESPACE_MARKER)
                .with_argument(ArgumentDescriptor::new("self", "const Tensor &")),
        ]
    }

    #[test]
    fn filters_ineligible_by_default() {
        let rows = classification_rows(&declarations(), false);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "rand_like");

        assert_eq!(classification_rows(&declarations(), true).len(), 2);
    }

    #[test]
    fn row_formatting() {
        let rows = classification_rows(&declarations(), true);
        let line = rows[0].to_string();
        assert!(line.starts_with("add "));
        assert!(line.contains("eligible=no "));
        assert!(line.ends_with("spelling=-                  shape=-"));
    }
}
