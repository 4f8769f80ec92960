//! Derives the six-object filter family used by search endpoints.
//!
//! For an object `O` the family is `OFilter` (the dispatch object) plus one
//! object per operator kind: `OFilterEquals`, `OFilterRange`,
//! `OFilterContains`, `OFilterLike` and `OFilterNull`. Fields whose type is
//! another object point at that object's own family member, so every nested
//! object reached from a target gets a family too.

use crate::endpoints::SEARCH;
use crate::graph::Reachable;
use crate::model::{Field, Object, Service};
use crate::request_errors::is_generated_request_error;
use crate::types::{
    is_comparable, is_nullable_or_array, is_object, is_string_like, Modifier, Operation, Primitive,
};

/// The operator-specific members of a filter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Equals,
    Range,
    Contains,
    Like,
    Null,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Equals,
        FilterKind::Range,
        FilterKind::Contains,
        FilterKind::Like,
        FilterKind::Null,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            FilterKind::Equals => "FilterEquals",
            FilterKind::Range => "FilterRange",
            FilterKind::Contains => "FilterContains",
            FilterKind::Like => "FilterLike",
            FilterKind::Null => "FilterNull",
        }
    }

    /// Name of this family member for `object`.
    pub fn name_for(self, object: &str) -> String {
        format!("{object}{}", self.suffix())
    }

    fn description(self, object: &str) -> String {
        match self {
            FilterKind::Equals => format!("Equality filters for {object}."),
            FilterKind::Range => format!("Range filters for the comparable fields of {object}."),
            FilterKind::Contains => format!("Membership filters for {object}."),
            FilterKind::Like => format!("Pattern filters for the text fields of {object}."),
            FilterKind::Null => format!("Null checks for the optional fields of {object}."),
        }
    }
}

/// Name of the dispatch object for `object`.
pub fn filter_name(object: &str) -> String {
    format!("{object}Filter")
}

/// Objects that need a filter family: read objects of readable resources,
/// everything reachable from non-search request bodies (including the
/// Create/Update bodies the endpoint synthesizer will derive), and every
/// object nested inside those.
pub fn filter_targets(service: &Service) -> Vec<String> {
    let mut reachable = Reachable::new();

    for resource in &service.resources {
        if resource.has_operation(Operation::Read) && service.has_object(&resource.name) {
            reachable.visit(service, &resource.name);
        }
    }

    for resource in &service.resources {
        reachable.collect(service, &resource.fields_for(Operation::Create));
        reachable.collect(service, &resource.fields_for(Operation::Update));
        for endpoint in resource.endpoints.iter().filter(|e| e.name != SEARCH) {
            reachable.collect(service, &endpoint.request.body_params);
        }
    }

    reachable
        .names()
        .iter()
        .filter(|name| is_object(service, name))
        .filter_map(|name| service.get_object(name))
        .filter(|object| {
            !is_generated_filter(service, object) && !is_generated_request_error(service, object)
        })
        .map(|object| object.name.clone())
        .collect()
}

/// Splits a family member name into its base object and kind. `None` as the
/// kind stands for the dispatch object.
fn split_family_name(name: &str) -> Option<(&str, Option<FilterKind>)> {
    FilterKind::ALL
        .into_iter()
        .find_map(|kind| name.strip_suffix(kind.suffix()).map(|base| (base, Some(kind))))
        .or_else(|| name.strip_suffix("Filter").map(|base| (base, None)))
        .filter(|(base, _)| !base.is_empty())
}

/// Whether `object` is exactly what this generator derives for its base
/// object. A declared type that only shares the naming pattern, such as a
/// `SavedFilter` resource, is not.
pub fn is_generated_filter(service: &Service, object: &Object) -> bool {
    let Some((base, kind)) = split_family_name(&object.name) else {
        return false;
    };
    let Some(base_object) = service.get_object(base) else {
        return false;
    };
    match kind {
        None => *object == dispatch_object(base),
        Some(kind) => *object == member_object(service, base_object, kind),
    }
}

/// Builds the dispatch object: two or four references per operator kind, an
/// OR switch, and nested sub-filters.
pub fn dispatch_object(object: &str) -> Object {
    let reference = |name: &str, kind: FilterKind, description: &str| {
        Field::new(name, kind.name_for(object))
            .with_description(description)
            .with_modifier(Modifier::Nullable)
    };

    let fields = vec![
        reference("Equals", FilterKind::Equals, "Fields that must equal the given values."),
        reference("NotEquals", FilterKind::Equals, "Fields that must differ from the given values."),
        reference("GreaterThan", FilterKind::Range, "Fields that must be greater than the given values."),
        reference("SmallerThan", FilterKind::Range, "Fields that must be smaller than the given values."),
        reference("GreaterOrEqual", FilterKind::Range, "Fields that must be greater than or equal to the given values."),
        reference("SmallerOrEqual", FilterKind::Range, "Fields that must be smaller than or equal to the given values."),
        reference("Contains", FilterKind::Contains, "Fields that must be one of the given values."),
        reference("NotContains", FilterKind::Contains, "Fields that must not be any of the given values."),
        reference("Like", FilterKind::Like, "Fields that must match the given patterns."),
        reference("NotLike", FilterKind::Like, "Fields that must not match the given patterns."),
        reference("Null", FilterKind::Null, "Fields that must be null."),
        reference("NotNull", FilterKind::Null, "Fields that must not be null."),
        Field::new("OrCondition", Primitive::Bool.as_str())
            .with_description("Combine the conditions with OR instead of AND.")
            .with_default("false"),
        Field::new("NestedFilters", filter_name(object))
            .with_description("Additional filters combined with this one.")
            .with_modifier(Modifier::Nullable)
            .with_modifier(Modifier::Array),
    ];

    Object::new(filter_name(object), format!("Search filter for {object}."), fields)
}

/// Projects one field of the filtered object into a family member, or drops it.
fn member_field(service: &Service, field: &Field, kind: FilterKind) -> Option<Field> {
    let nested = is_object(service, &field.field_type);
    let base = Field {
        name: field.name.clone(),
        description: field.description.clone(),
        field_type: field.field_type.clone(),
        default: None,
        example: field.example.clone(),
        modifiers: Vec::new(),
    };

    let projected = match kind {
        FilterKind::Equals => {
            let mut equals = base;
            equals.modifiers = field.modifiers.clone();
            if nested {
                equals.field_type = kind.name_for(&field.field_type);
            }
            equals.with_modifier(Modifier::Nullable)
        }
        FilterKind::Range if nested => retyped(base, kind).with_modifier(Modifier::Nullable),
        FilterKind::Range if is_comparable(&field.field_type) => {
            base.with_modifier(Modifier::Nullable)
        }
        FilterKind::Range => return None,
        FilterKind::Contains if nested => retyped(base, kind).with_modifier(Modifier::Nullable),
        FilterKind::Contains if field.field_type == Primitive::Timestamp.as_str() => return None,
        FilterKind::Contains => base.with_modifier(Modifier::Array),
        FilterKind::Like if nested => retyped(base, kind).with_modifier(Modifier::Nullable),
        FilterKind::Like if is_string_like(&field.field_type) => {
            base.with_modifier(Modifier::Nullable)
        }
        FilterKind::Like => return None,
        FilterKind::Null if is_nullable_or_array(field) => Field {
            field_type: Primitive::Bool.as_str().to_string(),
            example: None,
            ..base
        }
        .with_modifier(Modifier::Nullable),
        FilterKind::Null => return None,
    };
    Some(projected)
}

fn retyped(mut field: Field, kind: FilterKind) -> Field {
    field.field_type = kind.name_for(&field.field_type);
    field.example = None;
    field
}

/// Builds one operator-specific member. An object where no field qualifies
/// yields an empty member, which is valid.
pub fn member_object(service: &Service, object: &Object, kind: FilterKind) -> Object {
    let fields = object
        .fields
        .iter()
        .filter_map(|field| member_field(service, field, kind))
        .collect();
    Object::new(kind.name_for(&object.name), kind.description(&object.name), fields)
}

/// The complete family of `object`, dispatch object first.
pub fn filter_family(service: &Service, object: &Object) -> Vec<Object> {
    let mut family = vec![dispatch_object(&object.name)];
    family.extend(
        FilterKind::ALL
            .into_iter()
            .map(|kind| member_object(service, object, kind)),
    );
    family
}

/// Appends the filter family of every target object. Names that already
/// exist are left alone, so running this twice adds nothing.
pub fn generate(input: &Service) -> Service {
    let mut service = input.clone();
    let mut added = 0;

    for name in filter_targets(input) {
        let Some(object) = input.get_object(&name) else {
            continue;
        };
        for member in filter_family(input, object) {
            if service.push_object_once(member) {
                added += 1;
            }
        }
    }

    log::debug!("filter generation: added {added} objects");
    service
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Resource, ResourceField};

    fn field_names(object: &Object) -> Vec<&str> {
        object.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn sample_service() -> Service {
        let event = Object::new(
            "Events",
            "",
            vec![
                Field::new("ID", "UUID"),
                Field::new("Title", "String"),
                Field::new("Attendees", "Int"),
                Field::new("StartsAt", "Timestamp"),
                Field::new("Day", "Date"),
                Field::new("Public", "Bool"),
                Field::new("Note", "String").with_modifier(Modifier::Nullable),
                Field::new("Tags", "String").with_modifier(Modifier::Array),
                Field::new("Venue", "Address"),
                Field::new("Kind", "EventKind"),
            ],
        );
        let address = Object::new("Address", "", vec![Field::new("Street", "String")]);
        Service {
            enums: vec![crate::model::Enum {
                name: "EventKind".to_string(),
                ..Default::default()
            }],
            objects: vec![event, address],
            resources: vec![Resource {
                name: "Events".to_string(),
                operations: vec!["Read".to_string()],
                fields: vec![ResourceField::new(
                    Field::new("Title", "String"),
                    &[Operation::Read],
                )],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_dispatch_object_has_fourteen_fields() {
        let filter = dispatch_object("Events");
        assert_eq!(filter.name, "EventsFilter");
        assert_eq!(filter.fields.len(), 14);
        assert_eq!(filter.get_field("Equals").unwrap().field_type, "EventsFilterEquals");
        assert_eq!(filter.get_field("SmallerOrEqual").unwrap().field_type, "EventsFilterRange");
        assert_eq!(filter.get_field("NotNull").unwrap().field_type, "EventsFilterNull");
        let nested = filter.get_field("NestedFilters").unwrap();
        assert_eq!(nested.field_type, "EventsFilter");
        assert!(nested.is_array() && nested.is_nullable());
        assert_eq!(filter.get_field("OrCondition").unwrap().default.as_deref(), Some("false"));
    }

    #[test]
    fn test_member_admission_rules() {
        let service = sample_service();
        let events = service.get_object("Events").unwrap();

        let equals = member_object(&service, events, FilterKind::Equals);
        assert_eq!(equals.fields.len(), events.fields.len());
        assert!(equals.fields.iter().all(Field::is_nullable));
        assert_eq!(equals.get_field("Venue").unwrap().field_type, "AddressFilterEquals");
        assert_eq!(equals.get_field("Kind").unwrap().field_type, "EventKind");

        let range = member_object(&service, events, FilterKind::Range);
        assert_eq!(field_names(&range), vec!["Attendees", "StartsAt", "Day", "Venue"]);
        assert_eq!(range.get_field("Venue").unwrap().field_type, "AddressFilterRange");

        let contains = member_object(&service, events, FilterKind::Contains);
        assert!(contains.get_field("StartsAt").is_none());
        assert!(contains.get_field("Title").unwrap().is_array());
        assert_eq!(contains.get_field("Venue").unwrap().field_type, "AddressFilterContains");

        let like = member_object(&service, events, FilterKind::Like);
        assert_eq!(field_names(&like), vec!["Title", "Note", "Tags", "Venue"]);

        let null = member_object(&service, events, FilterKind::Null);
        assert_eq!(field_names(&null), vec!["Note", "Tags"]);
        assert!(null.fields.iter().all(|f| f.field_type == "Bool"));
    }

    #[test]
    fn test_timestamp_admission() {
        let service = sample_service();
        let events = service.get_object("Events").unwrap();
        let has = |kind| member_object(&service, events, kind).get_field("StartsAt").is_some();
        assert!(has(FilterKind::Equals));
        assert!(has(FilterKind::Range));
        assert!(!has(FilterKind::Contains));
        assert!(!has(FilterKind::Like));
    }

    #[test]
    fn test_generate_covers_nested_objects() {
        let service = generate(&sample_service());
        for object in ["Events", "Address"] {
            for suffix in ["Filter", "FilterEquals", "FilterRange", "FilterContains", "FilterLike", "FilterNull"] {
                let name = format!("{object}{suffix}");
                let count = service.objects.iter().filter(|o| o.name == name).count();
                assert_eq!(count, 1, "{name} should exist exactly once");
            }
        }
        assert!(!service.has_object("EventKindFilter"));
    }

    #[test]
    fn test_empty_member_is_valid() {
        let service = Service {
            objects: vec![Object::new("Flag", "", vec![Field::new("On", "Bool")])],
            ..Default::default()
        };
        let flag = service.get_object("Flag").unwrap();
        assert!(member_object(&service, flag, FilterKind::Range).fields.is_empty());
        assert!(member_object(&service, flag, FilterKind::Like).fields.is_empty());
        assert!(member_object(&service, flag, FilterKind::Null).fields.is_empty());
    }

    #[test]
    fn test_declared_filter_suffix_is_a_target() {
        let saved = Object::new("SavedFilter", "", vec![Field::new("Query", "String")]);
        let price = Object::new("PriceFilter", "", vec![Field::new("Max", "Int")]);
        let service = Service {
            objects: vec![saved, price],
            resources: vec![Resource {
                name: "SavedFilter".to_string(),
                operations: vec!["Create".to_string(), "Read".to_string()],
                fields: vec![ResourceField::new(
                    Field::new("Price", "PriceFilter"),
                    &[Operation::Create],
                )],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(filter_targets(&service), vec!["SavedFilter", "PriceFilter"]);

        let expanded = generate(&service);
        assert!(expanded.has_object("SavedFilterFilter"));
        assert!(expanded.has_object("PriceFilterFilterRange"));
        assert!(!is_generated_filter(&expanded, expanded.get_object("SavedFilter").unwrap()));
        assert!(is_generated_filter(&expanded, expanded.get_object("SavedFilterFilter").unwrap()));
        assert!(is_generated_filter(
            &expanded,
            expanded.get_object("SavedFilterFilterLike").unwrap()
        ));
        assert_eq!(generate(&expanded), expanded);
    }

    #[test]
    fn test_split_family_name() {
        assert_eq!(split_family_name("UsersFilter"), Some(("Users", None)));
        assert_eq!(
            split_family_name("UsersFilterEquals"),
            Some(("Users", Some(FilterKind::Equals)))
        );
        assert_eq!(split_family_name("Filter"), None);
        assert_eq!(split_family_name("Users"), None);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let once = generate(&sample_service());
        let twice = generate(&once);
        assert_eq!(once, twice);
    }
}
