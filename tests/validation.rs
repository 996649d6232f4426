//! Schema validator scenarios: clean providers, broken registrations,
//! and fixture trees with documents missing or malformed.

use std::fs;
use std::path::Path;

use medley::{
    CapabilityKey, ProviderDirectory, ResolveError, Resolver, SchemaCatalog, SchemaRef,
    SchemaValidator, Violation, test_support,
};

fn builtin_fixture_root() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn validator_with_fixture_root(root: impl Into<std::path::PathBuf>) -> SchemaValidator {
    SchemaValidator::new(Resolver::new(
        test_support::directory(),
        SchemaCatalog::new(root),
    ))
}

#[test]
fn clean_providers_validate_without_findings() {
    let validator = validator_with_fixture_root(builtin_fixture_root());
    assert_eq!(validator.validate_provider("acme").unwrap(), vec![]);
    assert_eq!(validator.validate_provider("globex").unwrap(), vec![]);
}

#[test]
fn validate_all_covers_every_registered_provider() {
    let validator = validator_with_fixture_root(builtin_fixture_root());
    let report = validator.validate_all();
    assert_eq!(report.len(), 2);
    assert!(report.values().all(Vec::is_empty));
}

#[test]
fn unknown_provider_is_the_only_hard_error() {
    let validator = validator_with_fixture_root(builtin_fixture_root());
    assert_eq!(
        validator.validate_provider("bogus").unwrap_err(),
        ResolveError::UnknownProvider("bogus".to_string())
    );
}

#[test]
fn broken_registrations_are_reported_not_thrown() {
    let validator = SchemaValidator::new(Resolver::new(
        ProviderDirectory::build([test_support::broken()]),
        SchemaCatalog::builtin(),
    ));
    let violations = validator.validate_provider("brokenco").unwrap();

    // One unbound claim, one non-callable binding, one schema mismatch.
    assert_eq!(violations.len(), 3);
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::MissingImplementation { capability, reason: ResolveError::ProviderDoesNotSupportCapability { .. } }
            if *capability == CapabilityKey::new("text", "summarize")
    )));
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::MissingImplementation { capability, reason: ResolveError::OperationNotCallable { .. } }
            if *capability == CapabilityKey::new("text", "sentiment_analysis")
    )));
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::SchemaMismatch { capability, expected: Some(SchemaRef::KeywordExtraction), declared: Some(SchemaRef::Summarize) }
            if *capability == CapabilityKey::new("text", "keyword_extraction")
    )));
}

#[test]
fn deleting_an_example_output_is_a_fixture_missing_finding() {
    let temp = tempfile::tempdir().unwrap();
    copy_tree(&builtin_fixture_root(), temp.path()).unwrap();
    fs::remove_file(temp.path().join("image/logo_detection/example_output.json")).unwrap();

    let validator = validator_with_fixture_root(temp.path());
    let violations = validator.validate_provider("acme").unwrap();
    assert_eq!(
        violations,
        vec![Violation::FixtureMissing {
            capability: CapabilityKey::new("image", "logo_detection"),
        }]
    );
}

#[test]
fn deleting_a_sample_input_is_a_sample_missing_finding() {
    let temp = tempfile::tempdir().unwrap();
    copy_tree(&builtin_fixture_root(), temp.path()).unwrap();
    fs::remove_file(temp.path().join("text/summarize/sample_input.json")).unwrap();

    let validator = validator_with_fixture_root(temp.path());
    let violations = validator.validate_provider("acme").unwrap();
    assert_eq!(
        violations,
        vec![Violation::SampleMissing {
            capability: CapabilityKey::new("text", "summarize"),
        }]
    );
}

#[test]
fn an_envelope_without_both_keys_is_malformed() {
    let temp = tempfile::tempdir().unwrap();
    copy_tree(&builtin_fixture_root(), temp.path()).unwrap();
    fs::write(
        temp.path().join("text/sentiment_analysis/example_output.json"),
        r#"{ "original_response": {} }"#,
    )
    .unwrap();

    let validator = validator_with_fixture_root(temp.path());
    let violations = validator.validate_provider("acme").unwrap();
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        &violations[0],
        Violation::FixtureMalformed { capability, message }
            if *capability == CapabilityKey::new("text", "sentiment_analysis")
                && message.contains("standardized_response")
    ));
}

#[test]
fn a_standardized_payload_of_the_wrong_shape_is_malformed() {
    let temp = tempfile::tempdir().unwrap();
    copy_tree(&builtin_fixture_root(), temp.path()).unwrap();
    fs::write(
        temp.path().join("text/sentiment_analysis/example_output.json"),
        r#"{ "original_response": {}, "standardized_response": { "result": "not sentiment" } }"#,
    )
    .unwrap();

    let validator = validator_with_fixture_root(temp.path());
    let violations = validator.validate_provider("acme").unwrap();
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        &violations[0],
        Violation::FixtureMalformed { capability, .. }
            if *capability == CapabilityKey::new("text", "sentiment_analysis")
    ));
}

#[test]
fn exempt_phases_need_no_fixtures_at_all() {
    // A fixture tree with nothing for the create_project phase is fine:
    // the builtin tree has no image/search/create_project directory and
    // acme still validates cleanly.
    let validator = validator_with_fixture_root(builtin_fixture_root());
    assert!(
        !builtin_fixture_root()
            .join("image/search/create_project")
            .exists()
    );
    assert_eq!(validator.validate_provider("acme").unwrap(), vec![]);
}
