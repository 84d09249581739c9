use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::config::HttpMethod;

struct NullBackend;

impl Backend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn supports(&self, _mode: SchedulingMode) -> bool {
        false
    }
}

fn config_for(backend: &str) -> BenchmarkConfiguration {
    BenchmarkConfiguration {
        url: "http://localhost:8080/".to_owned(),
        backend: backend.to_owned(),
        ..BenchmarkConfiguration::default()
    }
}

#[test]
fn outcome_constructors_are_mutually_exclusive() {
    let ok = ExecutionOutcome::success(200, Duration::from_millis(12));
    assert!(ok.success);
    assert_eq!(ok.status, Some(200));
    assert!(ok.error.is_none());

    let failed = ExecutionOutcome::failure("connection refused");
    assert!(!failed.success);
    assert!(failed.status.is_none());
    assert_eq!(failed.error.as_deref(), Some("connection refused"));
    assert_eq!(failed.elapsed, Duration::ZERO);
}

#[test]
fn default_trait_methods_report_unsupported_as_failed_outcomes() -> Result<(), String> {
    let spec = RequestSpec::from_configuration(&config_for("null"))
        .map_err(|err| format!("spec resolution failed: {}", err))?;

    let outcome = NullBackend.execute(&spec);
    assert!(!outcome.success);
    assert!(
        outcome
            .error
            .as_deref()
            .is_some_and(|msg| msg.contains("blocking"))
    );
    Ok(())
}

#[test]
fn request_spec_is_resolved_from_configuration() -> Result<(), String> {
    let mut config = config_for("reqwest");
    config.method = HttpMethod::Post;
    config
        .headers
        .insert("content-type".to_owned(), "application/json".to_owned());
    config.body = Some(b"{}".to_vec());

    let spec =
        RequestSpec::from_configuration(&config).map_err(|err| format!("spec failed: {}", err))?;
    assert_eq!(spec.method, HttpMethod::Post);
    assert_eq!(spec.url.as_str(), "http://localhost:8080/");
    assert_eq!(
        spec.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(spec.body.as_deref(), Some(b"{}".as_slice()));
    Ok(())
}

#[test]
fn builtin_registry_knows_the_reference_backends() {
    let registry = BackendRegistry::builtin();
    assert!(registry.contains("reqwest"));
    assert!(registry.contains("reqwest-blocking"));
}

#[test]
fn unknown_backend_fails_fast() {
    let registry = BackendRegistry::builtin();
    let config = config_for("nonexistent");
    assert!(matches!(
        registry.resolve(&config),
        Err(AppError::Config(ConfigError::UnknownBackend { .. }))
    ));
}

#[test]
fn registered_backend_resolves_through_its_factory() -> Result<(), String> {
    let mut registry = BackendRegistry::empty();
    registry.register("null", |_config| Ok(Arc::new(NullBackend) as Arc<dyn Backend>));

    let backend = registry
        .resolve(&config_for("null"))
        .map_err(|err| format!("resolve failed: {}", err))?;
    assert_eq!(backend.name(), "null");
    Ok(())
}

#[test]
fn builtin_backends_advertise_their_modes() -> Result<(), String> {
    let config = config_for("reqwest");
    let nonblocking = ReqwestBackend::from_configuration(&config)
        .map_err(|err| format!("build failed: {}", err))?;
    assert!(nonblocking.supports(SchedulingMode::NonBlocking));
    assert!(!nonblocking.supports(SchedulingMode::Blocking));

    let blocking = ReqwestBlockingBackend::from_configuration(&config)
        .map_err(|err| format!("build failed: {}", err))?;
    assert!(blocking.supports(SchedulingMode::Blocking));
    assert!(!blocking.supports(SchedulingMode::NonBlocking));
    Ok(())
}
