//! Shared building blocks every expanded service carries exactly once.

use crate::model::{Enum, EnumValue, Field, Object, Service};
use crate::types::Modifier;

pub const ERROR_CODE: &str = "ErrorCode";
pub const ERROR: &str = "Error";
pub const ERROR_FIELD_CODE: &str = "ErrorFieldCode";
pub const ERROR_FIELD: &str = "ErrorField";
pub const PAGINATION: &str = "Pagination";
pub const META: &str = "Meta";

pub fn error_code_enum() -> Enum {
    Enum {
        name: ERROR_CODE.to_string(),
        description: "Broad category of a failed request.".to_string(),
        values: vec![
            EnumValue::new("BadRequest", "The request was malformed."),
            EnumValue::new("Unauthorized", "Authentication is missing or invalid."),
            EnumValue::new("Forbidden", "The caller may not perform this action."),
            EnumValue::new("NotFound", "The requested resource does not exist."),
            EnumValue::new("Conflict", "The request conflicts with the current state."),
            EnumValue::new(
                "UnprocessableEntity",
                "One or more fields failed validation.",
            ),
            EnumValue::new("RateLimited", "Too many requests."),
            EnumValue::new("Internal", "An unexpected server error occurred."),
        ],
    }
}

pub fn error_object() -> Object {
    Object::new(
        ERROR,
        "Returned by every endpoint on failure.",
        vec![
            Field::new("Code", ERROR_CODE).with_description("Category of the error."),
            Field::new("Message", "String").with_description("Human readable explanation."),
            Field::new("RequestID", "String")
                .with_description("Identifier of the request, for support."),
        ],
    )
}

pub fn error_field_code_enum() -> Enum {
    Enum {
        name: ERROR_FIELD_CODE.to_string(),
        description: "Reason a single field was rejected.".to_string(),
        values: vec![
            EnumValue::new("AlreadyExists", "The value must be unique and is taken."),
            EnumValue::new("Required", "The field must be provided."),
            EnumValue::new("NotFound", "The referenced entity does not exist."),
            EnumValue::new("InvalidValue", "The value is not acceptable."),
            EnumValue::new("TooLong", "The value exceeds the maximum length."),
        ],
    }
}

pub fn error_field_object() -> Object {
    Object::new(
        ERROR_FIELD,
        "Validation failure of a single request field.",
        vec![
            Field::new("Code", ERROR_FIELD_CODE).with_description("Reason for the failure."),
            Field::new("Message", "String").with_description("Human readable explanation."),
        ],
    )
}

pub fn pagination_object() -> Object {
    Object::new(
        PAGINATION,
        "Position of a page within a result set.",
        vec![
            Field::new("Offset", "Int").with_description("Number of items skipped."),
            Field::new("Limit", "Int").with_description("Maximum number of items returned."),
            Field::new("Total", "Int").with_description("Total number of matching items."),
        ],
    )
}

pub fn meta_object() -> Object {
    Object::new(META, "Audit information of a stored entity.", audit_fields())
}

/// Creation and update audit columns; the `By` columns are nullable.
pub fn audit_fields() -> Vec<Field> {
    vec![
        Field::new("CreatedAt", "Timestamp").with_description("When the entity was created."),
        Field::new("CreatedBy", "UUID")
            .with_description("Who created the entity.")
            .with_modifier(Modifier::Nullable),
        Field::new("UpdatedAt", "Timestamp").with_description("When the entity was last updated."),
        Field::new("UpdatedBy", "UUID")
            .with_description("Who last updated the entity.")
            .with_modifier(Modifier::Nullable),
    ]
}

/// Appends each reserved entity that is not already declared. Existing
/// entries keep their position; new ones go after them.
pub fn inject(input: &Service) -> Service {
    let mut service = input.clone();
    let mut added = 0;

    for candidate in [error_code_enum(), error_field_code_enum()] {
        if service.has_enum(&candidate.name) {
            log::trace!("enum '{}' already declared, keeping it", candidate.name);
            continue;
        }
        service.enums.push(candidate);
        added += 1;
    }

    for candidate in [
        error_object(),
        error_field_object(),
        pagination_object(),
        meta_object(),
    ] {
        if service.push_object_once(candidate) {
            added += 1;
        }
    }

    log::debug!("default catalog: added {added} entities");
    service
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injects_all_defaults() {
        let service = inject(&Service::default());
        let enums: Vec<&str> = service.enums.iter().map(|e| e.name.as_str()).collect();
        let objects: Vec<&str> = service.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(enums, vec![ERROR_CODE, ERROR_FIELD_CODE]);
        assert_eq!(objects, vec![ERROR, ERROR_FIELD, PAGINATION, META]);
    }

    #[test]
    fn test_existing_pagination_is_kept_once() {
        let custom = Object::new(PAGINATION, "custom", vec![Field::new("Cursor", "String")]);
        let input = Service {
            objects: vec![custom.clone()],
            ..Default::default()
        };
        let service = inject(&input);
        let count = service.objects.iter().filter(|o| o.name == PAGINATION).count();
        assert_eq!(count, 1);
        assert_eq!(service.objects[0], custom);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = Service::default();
        let _ = inject(&input);
        assert!(input.objects.is_empty());
        assert!(input.enums.is_empty());
    }

    #[test]
    fn test_meta_by_columns_are_nullable() {
        let meta = meta_object();
        assert!(meta.get_field("CreatedBy").unwrap().is_nullable());
        assert!(!meta.get_field("CreatedAt").unwrap().is_nullable());
    }
}
