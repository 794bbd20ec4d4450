//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a project fixture laid out like a Salesforce DX
//! project, plus XML snippets for labels, workflow components and manifests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_label("Greeting", "Hello");
//!     fixture.command().arg("combine-labels").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::xml;
    pub use super::TestFixture;
}

/// Default project paths, relative to the fixture root.
pub const LABELS_DIR: &str = "force-app/main/default/labels";
pub const WORKFLOWS_DIR: &str = "force-app/main/default/workflows";
pub const MANIFEST: &str = "manifest/package.xml";
pub const LABELS_FILE: &str = "CustomLabels.labels-meta.xml";

/// XML snippets used across tests.
#[allow(dead_code)]
pub mod xml {
    /// A single label file in the version-control layout.
    pub fn label(full_name: &str, value: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<labels xmlns="http://soap.sforce.com/2006/04/metadata">
    <fullName>{full_name}</fullName>
    <language>en_US</language>
    <protected>false</protected>
    <shortDescription>{full_name}</shortDescription>
    <value>{value}</value>
</labels>
"#
        )
    }

    /// A single workflow component file, e.g. a rule or an alert.
    pub fn workflow_member(tag: &str, full_name: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<{tag} xmlns="http://soap.sforce.com/2006/04/metadata">
    <fullName>{full_name}</fullName>
    <description>{tag} {full_name}</description>
</{tag}>
"#
        )
    }

    /// A deploy manifest with one `<types>` block per `(type, members)`.
    pub fn manifest(types: &[(&str, &[&str])]) -> String {
        let mut body = String::new();
        for (name, members) in types {
            body.push_str("    <types>\n");
            for member in *members {
                body.push_str(&format!("        <members>{}</members>\n", member));
            }
            body.push_str(&format!("        <name>{}</name>\n", name));
            body.push_str("    </types>\n");
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Package xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n{}    <version>58.0</version>\n</Package>\n",
            body
        )
    }

    /// Markup that no XML parser accepts.
    pub const MALFORMED: &str = "<labels><fullName>Broken</labels>";
}

/// A test fixture that provides a temporary Salesforce DX project.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_label("Greeting", "Hello")
///     .with_workflow_member("Account", "rules", "Escalate");
///
/// fixture.command().arg("combine-labels").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with empty labels and workflows directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child(LABELS_DIR)
            .create_dir_all()
            .expect("Failed to create labels directory");
        temp_dir
            .child(WORKFLOWS_DIR)
            .create_dir_all()
            .expect("Failed to create workflows directory");
        Self { temp_dir }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a per-label file `<name>.xml`.
    pub fn with_label(self, full_name: &str, value: &str) -> Self {
        let path = format!("{}/{}.xml", LABELS_DIR, full_name);
        self.with_file(&path, &xml::label(full_name, value))
    }

    /// Add a per-component workflow file under `<parent>/<tag>/`.
    pub fn with_workflow_member(self, parent: &str, tag: &str, full_name: &str) -> Self {
        let path = format!(
            "{}/{}/{}/{}.{}-meta.xml",
            WORKFLOWS_DIR, parent, tag, full_name, tag
        );
        self.with_file(&path, &xml::workflow_member(tag, full_name))
    }

    /// Add the deploy manifest at its default location.
    pub fn with_manifest(self, types: &[(&str, &[&str])]) -> Self {
        self.with_file(MANIFEST, &xml::manifest(types))
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a fixture-relative path.
    pub fn join(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Path of the label aggregate at its default location.
    pub fn labels_aggregate(&self) -> PathBuf {
        self.join(LABELS_DIR).join(LABELS_FILE)
    }

    /// Path of a workflow aggregate at its default location.
    pub fn workflow_aggregate(&self, parent: &str) -> PathBuf {
        self.join(WORKFLOWS_DIR)
            .join(format!("{}.workflow-meta.xml", parent))
    }

    /// Read a fixture file to a string.
    pub fn read(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        fs::read_to_string(self.temp_dir.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command configured to run in this fixture's directory.
    ///
    /// The directory override variables are cleared so the defaults resolve
    /// inside the fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sf-aggregate");
        cmd.current_dir(self.path())
            .env_remove("SF_LABELS_DIR")
            .env_remove("SF_WORKFLOWS_DIR")
            .env_remove("SF_MANIFEST")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_project_layout() {
        let fixture = TestFixture::new();
        assert!(fixture.join(LABELS_DIR).is_dir());
        assert!(fixture.join(WORKFLOWS_DIR).is_dir());
    }

    #[test]
    fn test_fixture_with_label() {
        let fixture = TestFixture::new().with_label("Greeting", "Hello");
        let content = fixture.read(format!("{}/Greeting.xml", LABELS_DIR));
        assert!(content.contains("<fullName>Greeting</fullName>"));
    }

    #[test]
    fn test_manifest_snippet_lists_members_before_name() {
        let manifest = xml::manifest(&[("CustomLabel", &["A", "B"])]);
        let members = manifest.find("<members>A</members>").unwrap();
        let name = manifest.find("<name>CustomLabel</name>").unwrap();
        assert!(members < name);
    }
}
