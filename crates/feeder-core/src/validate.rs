//! Reference and completeness checks over a parsed document.

use tracing::debug;

use crate::classes::ClassRegistry;
use crate::diagnostics::Diagnostics;
use crate::document::Document;

/// Properties that name another object.
pub const REFERENCE_PROPERTIES: [&str; 3] = ["parent", "from", "to"];

/// Check every object for dangling references, duplicate names and
/// properties its class requires.
pub fn validate(doc: &Document, registry: &ClassRegistry) -> Diagnostics {
    let mut diag = Diagnostics::new();
    let ids = doc.walk();

    for &id in &ids {
        let Some(node) = doc.get(id) else { continue };
        let label = node.label();

        for property in REFERENCE_PROPERTIES {
            if let Some(target) = node.get(property) {
                if doc.find_by_name(target).is_empty() {
                    diag.add_error_with_entity(
                        "reference",
                        &format!("{property} `{target}` does not exist"),
                        &label,
                    );
                }
            }
        }

        let behavior = registry.behavior(node.class());
        for required in behavior.required_properties() {
            // nesting stands in for an explicit parent
            if *required == "parent" && node.parent().is_some() {
                continue;
            }
            if !node.has(required) {
                diag.add_warning_with_entity("required", &format!("missing `{required}`"), &label);
            }
        }
    }

    let mut duplicates: Vec<(&str, usize)> = doc
        .index()
        .values("name")
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(name, ids)| (name, ids.len()))
        .collect();
    duplicates.sort();
    for (name, count) in duplicates {
        diag.add_warning_with_entity(
            "duplicate",
            &format!("name used by {count} objects"),
            name,
        );
    }

    debug!(objects = ids.len(), summary = %diag.summary(), "validated document");
    diag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    #[test]
    fn reports_dangling_missing_and_duplicate() {
        let mut doc = Document::new();
        let n1 = doc.add_object([("class", "node"), ("name", "n1")]).unwrap();
        doc.add_object([("class", "node"), ("name", "n1")]).unwrap();
        doc.add_object([("class", "fuse"), ("name", "f1"), ("from", "n1")])
            .unwrap();
        doc.add_object([("class", "recorder"), ("parent", "n7")])
            .unwrap();
        doc.add_nested(n1, [("class", "recorder"), ("name", "r2")])
            .unwrap();

        let diag = validate(&doc, &ClassRegistry::with_defaults());

        let errors: Vec<_> = diag
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "parent `n7` does not exist");

        let required: Vec<_> = diag.issues_by_category("required").collect();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].message, "missing `to`");
        assert_eq!(required[0].entity.as_deref(), Some("fuse \"f1\""));

        let dup: Vec<_> = diag.issues_by_category("duplicate").collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(dup[0].entity.as_deref(), Some("n1"));
    }

    #[test]
    fn clean_document_has_no_issues() {
        let mut doc = Document::new();
        doc.add_object([("class", "node"), ("name", "a")]).unwrap();
        doc.add_object([("class", "node"), ("name", "b")]).unwrap();
        doc.add_object([
            ("class", "overhead_line"),
            ("name", "ab"),
            ("from", "a"),
            ("to", "b"),
        ])
        .unwrap();
        assert!(!validate(&doc, &ClassRegistry::with_defaults()).has_issues());
    }
}
