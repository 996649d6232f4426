//! Capability resolution: the naming contract, the error ladder, and
//! invocation through bound operations.

use medley::{
    CapabilityBase, CapabilityKey, InvokeError, OperationOutcome, ProviderDirectory, ResolveError,
    Resolver, SchemaCatalog, SchemaRef, StandardizedPayload, test_support,
};
use serde_json::{Value, json};

fn resolver() -> Resolver {
    Resolver::new(test_support::directory(), SchemaCatalog::builtin())
}

fn args(pairs: &[(&str, Value)]) -> medley::Args {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn every_claimed_capability_resolves_under_the_derived_name() {
    let resolver = resolver();
    for provider in resolver.directory().list_providers() {
        let claimed = resolver.directory().capabilities_of(provider).unwrap().clone();
        for key in &claimed {
            let bound = resolver.resolve(key, provider).unwrap();
            assert_eq!(bound.name(), key.operation_name());
            assert_eq!(bound.provider_name(), provider);
        }
    }
}

#[test]
fn unknown_provider_is_surfaced_first() {
    let resolver = resolver();
    let key = CapabilityKey::new("text", "sentiment_analysis");
    assert_eq!(
        resolver.resolve(&key, "bogus").unwrap_err(),
        ResolveError::UnknownProvider("bogus".to_string())
    );
}

#[test]
fn undeclared_capability_is_rejected() {
    let resolver = resolver();
    let key = CapabilityKey::new("video", "face_detection");
    assert!(matches!(
        resolver.resolve(&key, "acme").unwrap_err(),
        ResolveError::UnknownCapability(_)
    ));
}

#[test]
fn declared_capability_without_binding_is_unsupported() {
    let resolver = resolver();
    let key = CapabilityKey::new("text", "summarize");
    assert!(matches!(
        resolver.resolve(&key, "globex").unwrap_err(),
        ResolveError::ProviderDoesNotSupportCapability { .. }
    ));
}

#[test]
fn non_callable_binding_is_a_consistency_fault() {
    let directory = ProviderDirectory::build([test_support::broken()]);
    let resolver = Resolver::new(directory, SchemaCatalog::builtin());
    let key = CapabilityKey::new("text", "sentiment_analysis");
    assert_eq!(
        resolver.resolve(&key, "brokenco").unwrap_err(),
        ResolveError::OperationNotCallable {
            provider: "brokenco".to_string(),
            name: "text__sentiment_analysis".to_string(),
        }
    );
}

#[test]
fn resolve_all_returns_one_binding_per_declaring_provider() {
    let resolver = resolver();
    let key = CapabilityKey::new("text", "sentiment_analysis");
    let bound = resolver.resolve_all(&key);
    let mut providers: Vec<&str> = bound.iter().map(|b| b.provider_name()).collect();
    providers.sort_unstable();
    assert_eq!(providers, vec!["acme", "globex"]);
}

#[test]
fn resolve_all_with_no_support_is_empty_not_an_error() {
    let resolver = resolver();
    let unsupported = CapabilityKey::new("image", "unsupported_thing");
    assert!(resolver.resolve_all(&unsupported).is_empty());

    // Declared in the catalog, implemented by nobody.
    let anonymization = CapabilityKey::new("text", "anonymization");
    assert!(resolver.catalog().contains(&anonymization));
    assert!(resolver.resolve_all(&anonymization).is_empty());
}

#[test]
fn job_phases_resolve_independently() {
    let resolver = resolver();
    let base = CapabilityBase::new("audio", "speech_to_text_async");
    let launch = resolver.resolve(&base.launch_key(), "acme").unwrap();
    let result = resolver.resolve(&base.result_key(), "acme").unwrap();
    assert_eq!(launch.name(), "audio__speech_to_text_async__launch_job");
    assert_eq!(result.name(), "audio__speech_to_text_async__get_job_result");
}

#[tokio::test]
async fn invoking_a_bound_operation_yields_a_dual_payload_envelope() {
    let resolver = resolver();
    let key = CapabilityKey::new("text", "sentiment_analysis");
    let bound = resolver.resolve(&key, "acme").unwrap();

    let outcome = bound
        .invoke(&args(&[
            ("language", json!("en")),
            ("text", json!("works great")),
        ]))
        .await
        .unwrap();

    let envelope = outcome.into_response().unwrap();
    assert_eq!(envelope.schema(), SchemaRef::SentimentAnalysis);
    assert!(envelope.original_response.is_object());
    assert!(matches!(
        envelope.standardized_response,
        StandardizedPayload::SentimentAnalysis(_)
    ));
}

#[tokio::test]
async fn missing_arguments_are_an_invocation_error() {
    let resolver = resolver();
    let key = CapabilityKey::new("text", "sentiment_analysis");
    let bound = resolver.resolve(&key, "acme").unwrap();
    let err = bound.invoke(&args(&[("language", json!("en"))])).await.unwrap_err();
    assert!(matches!(err, InvokeError::InvalidArguments { .. }));
}

#[tokio::test]
async fn action_phases_acknowledge_without_an_envelope() {
    let resolver = resolver();
    let key = CapabilityKey::action("image", "search", "create_project");
    let bound = resolver.resolve(&key, "acme").unwrap();
    assert_eq!(bound.returns(), None);
    let outcome = bound.invoke(&medley::Args::new()).await.unwrap();
    assert_eq!(outcome, OperationOutcome::Acknowledged);
}

#[tokio::test]
async fn provider_configuration_failure_surfaces_at_first_use() {
    let directory = ProviderDirectory::build([test_support::misconfigured()]);
    let resolver = Resolver::new(directory, SchemaCatalog::builtin());
    let key = CapabilityKey::new("text", "sentiment_analysis");

    // Resolution does not touch settings.
    let bound = resolver.resolve(&key, "misconfigured").unwrap();

    let err = bound
        .invoke(&args(&[("language", json!("en")), ("text", json!("hi"))]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvokeError::ProviderConfiguration { ref provider, .. } if provider == "misconfigured"
    ));
}

#[test]
fn directory_lists_are_deduplicated_and_sorted() {
    let resolver = resolver();
    assert_eq!(resolver.directory().list_providers(), vec!["acme", "globex"]);

    let capabilities = resolver.directory().list_capabilities();
    // acme claims nine capabilities; globex's sentiment claim is a
    // duplicate and must not inflate the set.
    assert_eq!(capabilities.len(), 9);
    assert!(capabilities.contains(&CapabilityKey::new("text", "sentiment_analysis")));
}

#[test]
fn capability_info_is_recorded_per_binding() {
    let resolver = resolver();
    let provider = resolver.directory().get("acme").unwrap();
    let info = provider
        .info(&CapabilityKey::new("text", "summarize"))
        .unwrap();
    assert_eq!(info.version, "v1");
}

#[test]
fn sample_inputs_satisfy_declared_signatures() {
    let resolver = resolver();
    let catalog = resolver.catalog();
    for key in catalog.capabilities() {
        let policy = catalog.fixture_policy(key).unwrap();
        if !policy.requires_sample {
            continue;
        }
        let sample = catalog.sample_input_for(key).unwrap();
        for spec in catalog.signature_for(key).unwrap().args {
            if spec.required {
                assert!(
                    sample.contains_key(spec.name),
                    "{key} sample is missing `{}`",
                    spec.name
                );
            }
        }
    }
}
