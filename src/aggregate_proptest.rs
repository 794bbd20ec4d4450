//! Property-based tests for the aggregation engine.
//!
//! These tests use proptest to generate label sets, workflow groups and
//! manifests, and verify that the ordering, determinism, round-trip and
//! idempotence invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::fs;
    use std::path::Path;

    use proptest::prelude::*;
    use tempfile::TempDir;

    use crate::component::{self, Component};
    use crate::document::{self, Element};
    use crate::labels::{combine_labels, split_labels};
    use crate::manifest::{
        filter_sets, parent_workflow, Manifest, ManifestEntry, WORKFLOW_CHILD_TYPES,
    };
    use crate::rewrite::{render, rewrite_manifest};
    use crate::workflows::merge_workflows;

    const AGGREGATE: &str = "CustomLabels.labels-meta.xml";
    const TAGS: &[&str] = &["alerts", "fieldUpdates", "outboundMessages", "rules", "tasks"];

    fn api_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9_]{0,12}"
    }

    fn label_value() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9][a-zA-Z0-9 &<>]{0,20}"
    }

    fn write_label(dir: &Path, name: &str, value: &str) {
        let mut label = Element::new("labels");
        label.push(Element::text_element("fullName", name));
        label.push(Element::text_element("language", "en_US"));
        label.push(Element::text_element("value", value));
        document::write(&dir.join(format!("{}.xml", name)), &label).unwrap();
    }

    fn fields_by_name(dir: &Path) -> BTreeMap<String, Vec<(String, String)>> {
        let mut result = BTreeMap::new();
        for path in component::list_files(dir).unwrap() {
            if path.ends_with(AGGREGATE) {
                continue;
            }
            let component = Component::from_element(document::read(&path).unwrap()).unwrap();
            let fields = component
                .fields()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            result.insert(component.full_name().to_string(), fields);
        }
        result
    }

    // ============================================================================
    // Label merge/split properties
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: splitting a merged directory reproduces every label's fields
        #[test]
        fn split_of_merge_preserves_fields(
            labels in prop::collection::btree_map(api_name(), label_value(), 1..8)
        ) {
            let source = TempDir::new().unwrap();
            let output = TempDir::new().unwrap();
            for (name, value) in &labels {
                write_label(source.path(), name, value);
            }

            combine_labels(source.path(), AGGREGATE, None).unwrap();
            let report = split_labels(&source.path().join(AGGREGATE), output.path()).unwrap();

            prop_assert_eq!(report.written.len(), labels.len());
            prop_assert_eq!(fields_by_name(source.path()), fields_by_name(output.path()));
        }

        /// Property: merging an unchanged directory twice is byte-identical
        #[test]
        fn merge_is_deterministic(
            labels in prop::collection::btree_map(api_name(), label_value(), 0..8)
        ) {
            let dir = TempDir::new().unwrap();
            for (name, value) in &labels {
                write_label(dir.path(), name, value);
            }

            combine_labels(dir.path(), AGGREGATE, None).unwrap();
            let first = fs::read(dir.path().join(AGGREGATE)).unwrap();
            combine_labels(dir.path(), AGGREGATE, None).unwrap();
            let second = fs::read(dir.path().join(AGGREGATE)).unwrap();

            prop_assert_eq!(first, second);
        }
    }

    // ============================================================================
    // Workflow ordering properties
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: merged components are ordered by (tag, fullName) whatever the input
        #[test]
        fn merged_workflow_is_sorted_by_tag_then_name(
            members in prop::collection::btree_set((0..TAGS.len(), api_name()), 1..12)
        ) {
            let dir = TempDir::new().unwrap();
            for (tag_index, name) in &members {
                let tag = TAGS[*tag_index];
                let mut element = Element::new(tag);
                element.push(Element::text_element("fullName", name.as_str()));
                let path = dir
                    .path()
                    .join("Case")
                    .join(tag)
                    .join(format!("{}.{}-meta.xml", name, tag));
                document::write(&path, &element).unwrap();
            }

            let merged = merge_workflows(dir.path(), None).unwrap();
            let order: Vec<(String, String)> = merged["Case"]
                .child_elements()
                .map(|c| {
                    (
                        c.name().to_string(),
                        component::full_name_of(c).unwrap().to_string(),
                    )
                })
                .collect();
            let mut expected = order.clone();
            expected.sort();

            prop_assert_eq!(order.len(), members.len());
            prop_assert_eq!(order, expected);
        }
    }

    // ============================================================================
    // Manifest properties
    // ============================================================================

    fn manifest_entry() -> impl Strategy<Value = ManifestEntry> {
        let type_name = prop_oneof![
            Just("CustomLabel".to_string()),
            Just("Workflow".to_string()),
            Just("ApexClass".to_string()),
            prop::sample::select(WORKFLOW_CHILD_TYPES).prop_map(str::to_string),
        ];
        let member = prop_oneof![
            api_name(),
            (api_name(), api_name()).prop_map(|(parent, child)| format!("{}.{}", parent, child)),
        ];
        (type_name, prop::collection::vec(member, 0..5))
            .prop_map(|(name, members)| ManifestEntry { name, members })
    }

    proptest! {
        /// Property: the parent of a child member is a dot-free prefix of it
        #[test]
        fn parent_workflow_is_dot_free_prefix(member in "[A-Za-z0-9_.]{0,24}") {
            let parent = parent_workflow(&member);
            prop_assert!(member.starts_with(parent));
            prop_assert!(!parent.contains('.'));
        }

        /// Property: rewriting a rewritten manifest changes nothing
        #[test]
        fn rewrite_is_idempotent(entries in prop::collection::vec(manifest_entry(), 0..6)) {
            let manifest = Manifest { entries, version: Some("58.0".to_string()) };

            let once = rewrite_manifest(&manifest).unwrap();
            let twice = rewrite_manifest(&once).unwrap();

            prop_assert!(!once.has_workflow_children());
            prop_assert_eq!(render(&once), render(&twice));
        }

        /// Property: the rewrite keeps every workflow the filter asked for
        #[test]
        fn rewrite_preserves_filtered_workflows(
            entries in prop::collection::vec(manifest_entry(), 0..6)
        ) {
            let manifest = Manifest { entries, version: None };

            let before = filter_sets(&manifest).unwrap();
            let after = filter_sets(&rewrite_manifest(&manifest).unwrap()).unwrap();

            prop_assert_eq!(before.workflows, after.workflows);
            prop_assert_eq!(before.labels, after.labels);
            prop_assert!(!after.has_workflow_children);
        }
    }

    #[test]
    fn tags_fixture_is_sorted() {
        let sorted: BTreeSet<&str> = TAGS.iter().copied().collect();
        assert_eq!(sorted.into_iter().collect::<Vec<_>>(), TAGS.to_vec());
    }
}
