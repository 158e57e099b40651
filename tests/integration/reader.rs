//! Reading bundle files through the library API.

use cnab_deps::bundle::Bundle;
use cnab_deps::core::DepsError;
use cnab_deps::extensions::dependencies::{
    DEPENDENCIES_KEY, build_prerequisite_installation_name, has_dependencies, read_dependencies,
};
use cnab_deps::extensions::{ExtensionData, ExtensionRegistry};
use cnab_deps::test_utils::{BundleFixture, init_test_logging};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_and_plan_installation() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let path = BundleFixture::with_db_and_cache().version("v1.2.0").write_to(temp.path()).unwrap();

    let bundle = Bundle::load(&path).await.unwrap();
    assert_eq!(bundle.parsed_version().unwrap(), semver::Version::new(1, 2, 0));
    assert!(has_dependencies(&bundle));

    let plan: Vec<(String, String)> = read_dependencies(&bundle)
        .unwrap()
        .list_by_sequence()
        .into_iter()
        .map(|dep| (build_prerequisite_installation_name("prod", &dep.name), dep.bundle))
        .collect();

    assert_eq!(
        plan,
        vec![
            ("prod-db".to_string(), "example.com/db:1.0".to_string()),
            ("prod-cache".to_string(), "example.com/cache:2.0".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_bundle_without_extension() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let path = BundleFixture::new("plain").write_to(temp.path()).unwrap();

    let bundle = Bundle::load(&path).await.unwrap();
    assert!(!has_dependencies(&bundle));
    assert!(read_dependencies(&bundle).unwrap_err().is_not_defined());
}

#[tokio::test]
async fn test_invalid_bundle_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bundle.json");
    std::fs::write(&path, "{ \"name\": ").unwrap();

    let err = Bundle::load(&path).await.unwrap_err();
    match err {
        DepsError::BundleParseError { file, .. } => assert!(file.ends_with("bundle.json")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_registry_reads_fixture() {
    let bundle = BundleFixture::new("myapp")
        .requires_with_ranges("mysql", "example.com/mysql:5.7", &["5.7.x"], true)
        .required_extension(DEPENDENCIES_KEY)
        .build();

    let registry = ExtensionRegistry::with_builtin();
    assert!(registry.unsupported_required_extensions(&bundle).is_empty());

    let ExtensionData::Dependencies(deps) = registry.read(&bundle, DEPENDENCIES_KEY).unwrap();
    let mysql = &deps.requires["mysql"];
    assert_eq!(mysql.bundle, "example.com/mysql:5.7");
    let version = mysql.version.as_ref().unwrap();
    assert_eq!(version.ranges, vec!["5.7.x"]);
    assert!(version.allow_prereleases);
}

#[test]
fn test_malformed_payload_reports_content() {
    let bundle = BundleFixture::new("bad")
        .raw_dependencies(json!({ "sequence": ["db"], "requires": ["db"] }))
        .build();

    match read_dependencies(&bundle).unwrap_err() {
        DepsError::SerializationError {
            operation,
            content,
            ..
        } => {
            assert_eq!(operation, "unmarshal");
            assert!(content.contains(r#""requires":["db"]"#), "{content}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
