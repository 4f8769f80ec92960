//! Generates the error-reporting shadows of request payloads.
//!
//! A shadow mirrors the shape of a payload but carries an [`ErrorField`]
//! (or a nested shadow) in place of every value, so a server can report
//! which part of a request body was rejected and why.
//!
//! [`ErrorField`]: crate::defaults::ERROR_FIELD

use crate::defaults::ERROR_FIELD;
use crate::endpoints::SEARCH;
use crate::filters::is_generated_filter;
use crate::graph::Reachable;
use crate::model::{Endpoint, Field, Object, Service};
use crate::types::{is_object, Modifier, REQUEST_ERROR_SUFFIX};

pub fn request_error_name(type_name: &str) -> String {
    format!("{type_name}{REQUEST_ERROR_SUFFIX}")
}

/// Name of the shadow of one endpoint's body, e.g. `UsersCreateRequestError`.
pub fn endpoint_error_name(resource: &str, endpoint: &str) -> String {
    format!("{resource}{endpoint}{REQUEST_ERROR_SUFFIX}")
}

/// Shadows one field. Every shadow field is nullable: absent means no error.
pub fn shadow_field(service: &Service, field: &Field) -> Field {
    let shadowed = is_object(service, &field.field_type)
        && service
            .get_object(&field.field_type)
            .is_some_and(|object| !is_generated_filter(service, object));
    let field_type = if shadowed {
        request_error_name(&field.field_type)
    } else {
        ERROR_FIELD.to_string()
    };
    let mut shadow = Field::new(field.name.clone(), field_type)
        .with_description(format!("Error for '{}', if any.", field.name))
        .with_modifier(Modifier::Nullable);
    if field.is_array() && shadow.field_type != ERROR_FIELD {
        shadow = shadow.with_modifier(Modifier::Array);
    }
    shadow
}

fn shadow_object(service: &Service, name: String, description: String, fields: &[Field]) -> Object {
    let fields = fields.iter().map(|f| shadow_field(service, f)).collect();
    Object::new(name, description, fields)
}

fn object_shadow(service: &Service, object: &Object) -> Object {
    shadow_object(
        service,
        request_error_name(&object.name),
        format!("Field errors of a rejected {}.", object.name),
        &object.fields,
    )
}

fn endpoint_shadow(service: &Service, resource: &str, endpoint: &Endpoint) -> Object {
    shadow_object(
        service,
        endpoint_error_name(resource, &endpoint.name),
        format!("Field errors of a rejected {resource} {} request.", endpoint.name),
        &endpoint.request.body_params,
    )
}

/// Whether `object` is exactly a shadow this generator derives, either of a
/// declared object or of an endpoint body. A declared `LoginRequestError`
/// that differs from any derived shadow is an ordinary object.
pub fn is_generated_request_error(service: &Service, object: &Object) -> bool {
    let Some(base) = object.name.strip_suffix(REQUEST_ERROR_SUFFIX) else {
        return false;
    };
    if base.is_empty() {
        return false;
    }
    if let Some(shadowed) = service.get_object(base) {
        if *object == object_shadow(service, shadowed) {
            return true;
        }
    }
    service.resources.iter().any(|resource| {
        resource.endpoints.iter().any(|endpoint| {
            endpoint_error_name(&resource.name, &endpoint.name) == object.name
                && *object == endpoint_shadow(service, &resource.name, endpoint)
        })
    })
}

/// Every type reachable from the body of a non-search endpoint.
pub fn request_types(service: &Service) -> Reachable {
    let mut reachable = Reachable::new();
    for resource in &service.resources {
        for endpoint in resource.endpoints.iter().filter(|e| e.name != SEARCH) {
            reachable.collect(service, &endpoint.request.body_params);
        }
    }
    reachable
}

/// Emits `<Object>RequestError` for every object a request body can carry,
/// then `<Resource><Endpoint>RequestError` for every endpoint with a body.
pub fn generate(input: &Service) -> Service {
    let mut service = input.clone();
    let mut added = 0;

    for name in request_types(input).names() {
        let Some(object) = input.get_object(name) else {
            continue;
        };
        if is_generated_filter(input, object) || is_generated_request_error(input, object) {
            continue;
        }
        if service.push_object_once(object_shadow(input, object)) {
            added += 1;
        }
    }

    for resource in &input.resources {
        for endpoint in &resource.endpoints {
            if endpoint.name == SEARCH || endpoint.request.body_params.is_empty() {
                continue;
            }
            if service.push_object_once(endpoint_shadow(input, &resource.name, endpoint)) {
                added += 1;
            }
        }
    }

    log::debug!("request error generation: added {added} objects");
    service
}
