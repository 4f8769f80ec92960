//! Turns readable resources into concrete objects (their read shape).

use crate::defaults::{audit_fields, META};
use crate::model::{Field, Object, Resource, Service};
use crate::types::{Operation, Primitive};

/// The identity column followed by the audit columns.
pub fn auto_columns() -> Vec<Field> {
    let mut fields = vec![Field::new("ID", "UUID")
        .with_description("Unique identifier.")
        .with_example(Primitive::Uuid.example())];
    fields.extend(audit_fields());
    fields
}

/// Builds the read object of `resource`: auto-columns (or a single `Meta`
/// reference when they are skipped), then its Read fields in declared order.
pub fn read_object(resource: &Resource) -> Object {
    let mut fields = if resource.skip_auto_columns {
        vec![Field::new(META, META).with_description("Audit information.")]
    } else {
        auto_columns()
    };

    fields.extend(
        resource
            .fields_for(Operation::Read)
            .into_iter()
            .map(with_example),
    );

    Object::new(resource.name.clone(), resource.description.clone(), fields)
}

/// Keeps a declared example; primitives without one get a representative value.
fn with_example(mut field: Field) -> Field {
    if field.example.is_none() {
        if let Ok(primitive) = field.field_type.parse::<Primitive>() {
            field.example = Some(primitive.example().to_string());
        }
    }
    field
}

/// Emits a read object for every resource exposing Read, unless an object of
/// that name already exists.
pub fn materialize(input: &Service) -> Service {
    let mut service = input.clone();
    let mut added = 0;

    for resource in &input.resources {
        if !resource.has_operation(Operation::Read) {
            continue;
        }
        if service.push_object_once(read_object(resource)) {
            added += 1;
        }
    }

    log::debug!("materialized {added} resource objects");
    service
}
