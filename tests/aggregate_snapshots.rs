//! Snapshot tests for the canonical aggregate output using insta.
//!
//! The deploy API and code review both depend on generated files looking
//! exactly like what the platform CLI retrieves, so the layout is pinned here.
//!
//! To update snapshots after intentional changes:
//! ```bash
//! cargo insta test --accept
//! ```

use std::fs;

use sf_aggregate::document::to_xml_string;
use sf_aggregate::labels::merge_labels;
use sf_aggregate::manifest::Manifest;
use sf_aggregate::rewrite::{render, rewrite_manifest};
use sf_aggregate::workflows::merge_workflows;
use tempfile::TempDir;

#[test]
fn test_label_aggregate_snapshot() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("Welcome.xml"),
        "<labels>\n  <fullName>Welcome</fullName>\n  <language>en_US</language>\n  <value>Hi &amp; welcome</value>\n</labels>",
    )
    .unwrap();
    fs::write(
        temp.path().join("Farewell.xml"),
        "<labels xmlns=\"http://soap.sforce.com/2006/04/metadata\"><fullName>Farewell</fullName><protected>true</protected><value>Bye</value></labels>",
    )
    .unwrap();

    let root = merge_labels(temp.path(), "CustomLabels.labels-meta.xml", None).unwrap();

    insta::assert_snapshot!(to_xml_string(&root), @r#"
<?xml version="1.0" encoding="UTF-8"?>
<CustomLabels xmlns="http://soap.sforce.com/2006/04/metadata">
    <labels>
        <fullName>Farewell</fullName>
        <protected>true</protected>
        <value>Bye</value>
    </labels>
    <labels>
        <fullName>Welcome</fullName>
        <language>en_US</language>
        <value>Hi &amp; welcome</value>
    </labels>
</CustomLabels>
"#);
}

#[test]
fn test_workflow_aggregate_snapshot() {
    let temp = TempDir::new().unwrap();
    for (tag, name) in [("rules", "Escalate"), ("alerts", "Notify"), ("rules", "Close")] {
        let dir = temp.path().join("Case").join(tag);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(format!("{}.{}-meta.xml", name, tag)),
            format!("<{tag}><fullName>{name}</fullName><active>true</active></{tag}>"),
        )
        .unwrap();
    }

    let merged = merge_workflows(temp.path(), None).unwrap();

    insta::assert_snapshot!(to_xml_string(&merged["Case"]), @r#"
<?xml version="1.0" encoding="UTF-8"?>
<Workflow xmlns="http://soap.sforce.com/2006/04/metadata">
    <alerts>
        <fullName>Notify</fullName>
        <active>true</active>
    </alerts>
    <rules>
        <fullName>Close</fullName>
        <active>true</active>
    </rules>
    <rules>
        <fullName>Escalate</fullName>
        <active>true</active>
    </rules>
</Workflow>
"#);
}

#[test]
fn test_rewritten_manifest_snapshot() {
    let manifest = Manifest::parse_str(
        r#"<Package xmlns="http://soap.sforce.com/2006/04/metadata">
    <types>
        <members>Util</members>
        <name>ApexClass</name>
    </types>
    <types>
        <members>Account.Escalate</members>
        <members>Case.Close</members>
        <name>WorkflowRule</name>
    </types>
    <types>
        <members>Account.Notify</members>
        <name>WorkflowAlert</name>
    </types>
    <types>
        <members>Welcome</members>
        <name>CustomLabel</name>
    </types>
    <version>58.0</version>
</Package>"#,
    )
    .unwrap();

    let rewritten = rewrite_manifest(&manifest).unwrap();

    insta::assert_snapshot!(render(&rewritten), @r#"
<?xml version="1.0" encoding="UTF-8"?>
<Package xmlns="http://soap.sforce.com/2006/04/metadata">
    <types>
        <members>Util</members>
        <name>ApexClass</name>
    </types>
    <types>
        <members>Account</members>
        <members>Case</members>
        <name>Workflow</name>
    </types>
    <types>
        <members>Welcome</members>
        <name>CustomLabel</name>
    </types>
    <version>58.0</version>
</Package>
"#);
}
