/// Unit tests for DiError, UtilityError and DiResult
use ferrous_services::{DiError, DiResult, UtilityError};
use std::error::Error;

#[test]
fn test_error_display_unknown_type() {
    let error = DiError::UnknownType("app::WidgetService".to_string());
    assert_eq!(error.to_string(), "Unknown type: app::WidgetService");
}

#[test]
fn test_error_display_missing_configuration() {
    let error = DiError::MissingConfiguration { parameter: "config".to_string() };
    assert_eq!(
        error.to_string(),
        "No configuration is available and is required by config"
    );
}

#[test]
fn test_error_display_invalid_property() {
    let error = DiError::InvalidProperty { parameter: "mailer".to_string(), source: None };
    assert_eq!(error.to_string(), "Invalid service property mailer");
    assert!(error.source().is_none());
}

#[test]
fn test_invalid_property_keeps_utility_cause() {
    let error = DiError::InvalidProperty {
        parameter: "mailer".to_string(),
        source: Some(UtilityError::UnknownCapability("app::Mailer".to_string())),
    };
    let cause = error.source().expect("utility cause");
    assert_eq!(cause.to_string(), "Unknown utility capability: app::Mailer");
}

#[test]
fn test_error_display_circular() {
    let path = vec!["A".to_string(), "B".to_string(), "C".to_string(), "A".to_string()];
    let error = DiError::Circular(path);
    assert_eq!(
        error.to_string(),
        "Cyclic dependency discovered while loading A -> B -> C -> A"
    );
    assert_eq!(error.cycle_path().unwrap().len(), 4);
    assert!(DiError::UnknownType("A".to_string()).cycle_path().is_none());
}

#[test]
fn test_error_display_uninitialized_utility_factory() {
    assert_eq!(
        DiError::UninitializedUtilityFactory.to_string(),
        "Utility factory hasn't been initialized"
    );
}

#[test]
fn test_utility_error_is_transparent() {
    let error: DiError = UtilityError::Construction {
        capability: "app::Clock".to_string(),
        message: "ntp unreachable".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "Utility app::Clock failed: ntp unreachable");
    assert!(matches!(error, DiError::Utility(UtilityError::Construction { .. })));
}

#[test]
fn test_error_display_remaining_variants() {
    let cases = [
        (
            DiError::TypeMismatch { name: "Svc::p".to_string(), expected: "u32" },
            "Type mismatch for Svc::p: expected u32",
        ),
        (
            DiError::DataAccess { type_name: "WidgetDAO".to_string(), message: "down".to_string() },
            "Data access error for WidgetDAO: down",
        ),
        (DiError::construction("WidgetService", "boom"), "Failed to construct WidgetService: boom"),
        (DiError::DepthExceeded(1024), "Max depth 1024 exceeded"),
        (
            DiError::InvalidConfiguration("bad root".to_string()),
            "Invalid configuration: bad root",
        ),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_di_result_propagation() {
    fn inner() -> DiResult<u8> {
        Err(DiError::UnknownType("X".to_string()))
    }
    fn outer() -> DiResult<u8> {
        let value = inner()?;
        Ok(value + 1)
    }
    assert!(matches!(outer(), Err(DiError::UnknownType(_))));
}
