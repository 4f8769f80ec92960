//! Structural validation of a service tree.
//!
//! Checks run top-down and stop at the first violation. Messages name the
//! offending element by 1-based index and name so they stay useful when the
//! position tracker cannot locate the source line.

use crate::error::{ValidationCategory, ValidationError};
use crate::model::{Field, RetryConfig, Service, TimeoutConfig};
use crate::types::{is_known_type, Modifier, Operation};

pub const RETRY_STRATEGIES: [&str; 1] = ["backoff"];

type Result<T> = std::result::Result<T, ValidationError>;

pub fn validate(service: &Service) -> Result<()> {
    if let Some(retry) = &service.retry {
        validate_retry(retry)?;
    }
    if let Some(timeout) = &service.timeout {
        validate_timeout(timeout)?;
    }

    for (i, resource) in service.resources.iter().enumerate() {
        let scope = format!("resource {} ({})", i + 1, resource.name);
        validate_operations(&scope, &resource.operations)?;

        for (j, resource_field) in resource.fields.iter().enumerate() {
            let field = &resource_field.field;
            let field_scope = format!("{scope}: field {} ({})", j + 1, field.name);
            validate_operations(&field_scope, &resource_field.operations)?;
            validate_field_shape(service, &field_scope, field)?;
        }

        for (j, endpoint) in resource.endpoints.iter().enumerate() {
            let endpoint_scope = format!("{scope}: endpoint {} ({})", j + 1, endpoint.name);
            let request = &endpoint.request;
            let response = &endpoint.response;
            let groups: [(&str, &[Field]); 6] = [
                ("request header", request.headers.as_slice()),
                ("path parameter", request.path_params.as_slice()),
                ("query parameter", request.query_params.as_slice()),
                ("body parameter", request.body_params.as_slice()),
                ("response header", response.headers.as_slice()),
                ("response field", response.body_fields.as_slice()),
            ];
            for (label, fields) in groups {
                validate_fields(service, &endpoint_scope, label, fields)?;
            }
            if let Some(body) = &response.body_object {
                if !resolves(service, body) {
                    return Err(ValidationError::new(
                        ValidationCategory::InvalidType,
                        format!("{endpoint_scope}: response body: invalid type '{body}'"),
                    )
                    .with_value(body.clone()));
                }
            }
        }
    }

    for (i, object) in service.objects.iter().enumerate() {
        let scope = format!("object {} ({})", i + 1, object.name);
        validate_fields(service, &scope, "field", &object.fields)?;
    }

    Ok(())
}

fn validate_fields(service: &Service, scope: &str, label: &str, fields: &[Field]) -> Result<()> {
    for (i, field) in fields.iter().enumerate() {
        let field_scope = format!("{scope}: {label} {} ({})", i + 1, field.name);
        validate_field_shape(service, &field_scope, field)?;
    }
    Ok(())
}

fn validate_operations(scope: &str, operations: &[String]) -> Result<()> {
    match operations.iter().find(|op| op.parse::<Operation>().is_err()) {
        Some(op) => Err(ValidationError::new(
            ValidationCategory::InvalidOperation,
            format!("{scope}: invalid operation '{op}', expected one of Create, Read, Update, Delete"),
        )
        .with_value(op.clone())),
        None => Ok(()),
    }
}

/// A declared type, or a readable resource whose object the expansion will
/// materialize.
fn resolves(service: &Service, type_name: &str) -> bool {
    is_known_type(service, type_name)
        || service
            .get_resource(type_name)
            .is_some_and(|r| r.has_operation(Operation::Read))
}

fn validate_field_shape(service: &Service, scope: &str, field: &Field) -> Result<()> {
    if !resolves(service, &field.field_type) {
        return Err(ValidationError::new(
            ValidationCategory::InvalidType,
            format!("{scope}: invalid type '{}'", field.field_type),
        )
        .with_value(field.field_type.clone()));
    }
    if let Some(modifier) = field.modifiers.iter().find(|m| m.parse::<Modifier>().is_err()) {
        return Err(ValidationError::new(
            ValidationCategory::InvalidModifier,
            format!("{scope}: invalid modifier '{modifier}', expected Nullable or Array"),
        )
        .with_value(modifier.clone()));
    }
    Ok(())
}

fn retry_error(message: String) -> ValidationError {
    ValidationError::new(ValidationCategory::InvalidRetry, format!("retry: {message}"))
}

pub fn validate_retry(retry: &RetryConfig) -> Result<()> {
    let intervals = [
        ("initialIntervalMs", retry.initial_interval_ms),
        ("maxIntervalMs", retry.max_interval_ms),
        ("maxElapsedTimeMs", retry.max_elapsed_time_ms),
    ];
    for (name, value) in intervals {
        if value < 0 {
            return Err(retry_error(format!("{name} must not be negative, got {value}")));
        }
    }
    if retry.initial_interval_ms > retry.max_interval_ms {
        return Err(retry_error(format!(
            "initialIntervalMs ({}) exceeds maxIntervalMs ({})",
            retry.initial_interval_ms, retry.max_interval_ms
        )));
    }
    if !RETRY_STRATEGIES.contains(&retry.strategy.as_str()) {
        return Err(
            retry_error(format!("unknown strategy '{}', expected backoff", retry.strategy))
                .with_value(retry.strategy.clone()),
        );
    }
    if let Some(exponent) = retry.exponent {
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(retry_error(format!("exponent must be a non-negative number, got {exponent}")));
        }
    }
    if let Some(code) = retry.status_codes.iter().find(|c| !is_status_pattern(c)) {
        return Err(retry_error(format!(
            "invalid status code '{code}', expected a code between 100 and 599 or a class like 5XX"
        ))
        .with_value(code.clone()));
    }
    Ok(())
}

pub fn validate_timeout(timeout: &TimeoutConfig) -> Result<()> {
    if timeout.timeout_ms < 0 {
        return Err(ValidationError::new(
            ValidationCategory::InvalidTimeout,
            format!("timeout: timeoutMs must not be negative, got {}", timeout.timeout_ms),
        ));
    }
    Ok(())
}

/// `1XX`..`5XX`, or a literal code from 100 to 599.
fn is_status_pattern(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
        return false;
    }
    bytes[1..] == *b"XX" || bytes[1..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, EndpointResponse, Object, Resource, ResourceField};

    fn orders(field: Field, operations: &[&str]) -> Service {
        Service {
            resources: vec![
                Resource {
                    name: "Users".to_string(),
                    operations: vec!["Read".to_string()],
                    ..Default::default()
                },
                Resource {
                    name: "Orders".to_string(),
                    operations: vec!["Create".to_string(), "Read".to_string()],
                    fields: vec![ResourceField {
                        field,
                        operations: operations.iter().map(|op| op.to_string()).collect(),
                    }],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_service() {
        let service = orders(Field::new("status", "String"), &["Create", "Read"]);
        assert!(validate(&service).is_ok());
    }

    #[test]
    fn test_wrong_case_operation() {
        let service = orders(Field::new("status", "String"), &["create"]);
        let err = validate(&service).unwrap_err();
        assert_eq!(err.category, ValidationCategory::InvalidOperation);
        assert_eq!(err.path, "operations");
        assert_eq!(err.value.as_deref(), Some("create"));
        assert!(err
            .message
            .starts_with("resource 2 (Orders): field 1 (status): invalid operation 'create'"));
    }

    #[test]
    fn test_unknown_modifier() {
        let mut field = Field::new("status", "String");
        field.modifiers.push("Optional".to_string());
        let err = validate(&orders(field, &["Read"])).unwrap_err();
        assert_eq!(err.category, ValidationCategory::InvalidModifier);
        assert_eq!(err.category.to_string(), "invalid modifier");
    }

    #[test]
    fn test_unknown_type() {
        let err = validate(&orders(Field::new("status", "Strng"), &["Read"])).unwrap_err();
        assert_eq!(err.category, ValidationCategory::InvalidType);
        assert_eq!(err.path, "type");
    }

    #[test]
    fn test_resource_operation_checked_before_fields() {
        let mut service = orders(Field::new("status", "Strng"), &["Read"]);
        service.resources[1].operations.push("Patch".to_string());
        let err = validate(&service).unwrap_err();
        assert_eq!(err.category, ValidationCategory::InvalidOperation);
        assert!(err.message.starts_with("resource 2 (Orders): invalid operation 'Patch'"));
    }

    #[test]
    fn test_object_fields_checked() {
        let service = Service {
            objects: vec![Object::new("Address", "", vec![Field::new("zip", "Zip")])],
            ..Default::default()
        };
        let err = validate(&service).unwrap_err();
        assert_eq!(err.message, "object 1 (Address): field 1 (zip): invalid type 'Zip'");
    }

    #[test]
    fn test_endpoint_response_body_object_checked() {
        let mut service = orders(Field::new("status", "String"), &["Read"]);
        service.resources[0].endpoints.push(Endpoint {
            name: "Get".to_string(),
            response: EndpointResponse {
                body_object: Some("Missing".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });
        let err = validate(&service).unwrap_err();
        assert_eq!(err.category, ValidationCategory::InvalidType);
    }

    #[test]
    fn test_readable_resource_resolves_before_expansion() {
        let mut service = orders(Field::new("status", "String"), &["Read"]);
        service.resources[0].endpoints.push(Endpoint {
            name: "Get".to_string(),
            response: EndpointResponse {
                body_object: Some("Users".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(validate(&service).is_ok());
    }

    #[test]
    fn test_retry_policy() {
        let valid = RetryConfig {
            strategy: "backoff".to_string(),
            initial_interval_ms: 500,
            max_interval_ms: 60_000,
            max_elapsed_time_ms: 3_600_000,
            exponent: Some(1.5),
            status_codes: vec!["5XX".to_string(), "429".to_string()],
            retry_connection_errors: true,
        };
        assert!(validate_retry(&valid).is_ok());

        let inverted = RetryConfig {
            initial_interval_ms: 70_000,
            ..valid.clone()
        };
        assert!(validate_retry(&inverted).is_err());

        let negative = RetryConfig {
            max_elapsed_time_ms: -1,
            ..valid.clone()
        };
        assert_eq!(
            validate_retry(&negative).unwrap_err().category,
            ValidationCategory::InvalidRetry
        );

        let strategy = RetryConfig {
            strategy: "linear".to_string(),
            ..valid.clone()
        };
        assert!(validate_retry(&strategy).is_err());

        for code in ["6XX", "600", "099", "5xx", "50"] {
            let bad = RetryConfig {
                status_codes: vec![code.to_string()],
                ..valid.clone()
            };
            assert!(validate_retry(&bad).is_err(), "{code} should be rejected");
        }
    }

    #[test]
    fn test_timeout() {
        let service = Service {
            timeout: Some(TimeoutConfig { timeout_ms: -5 }),
            ..Default::default()
        };
        let err = validate(&service).unwrap_err();
        assert_eq!(err.category, ValidationCategory::InvalidTimeout);
        assert_eq!(err.path, "timeout");
    }

    #[test]
    fn test_status_pattern() {
        assert!(is_status_pattern("1XX"));
        assert!(is_status_pattern("503"));
        assert!(is_status_pattern("100"));
        assert!(!is_status_pattern("X00"));
    }
}
