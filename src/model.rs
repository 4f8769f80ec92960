//! The in-memory tree of a resource definition document.
//!
//! Every collection keeps insertion order and tolerates duplicate names.
//! Lookups scan front to back and return the first match.

use crate::types::{Modifier, Operation};
use crate::utils::to_kebab_case;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The root of a document: service metadata plus every declared entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
    pub enums: Vec<Enum>,
    pub objects: Vec<Object>,
    pub resources: Vec<Resource>,
}

impl Service {
    pub fn has_enum(&self, name: &str) -> bool {
        self.enums.iter().any(|e| e.name == name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn has_object(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o.name == name)
    }

    pub fn get_object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn get_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Appends an object unless one with the same name is already present.
    /// Returns whether the object was added.
    pub(crate) fn push_object_once(&mut self, object: Object) -> bool {
        if self.has_object(&object.name) {
            log::trace!("object '{}' already present, skipping", object.name);
            return false;
        }
        self.objects.push(object);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Enum {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumValue {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl EnumValue {
    pub fn new(name: &str, description: &str) -> Self {
        EnumValue {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// A named collection of fields. Declared shapes and every generated family
/// (read objects, filters, request errors) share this representation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Object {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub fields: Vec<Field>,
}

impl Object {
    pub fn new(name: impl Into<String>, description: impl Into<String>, fields: Vec<Field>) -> Self {
        Object {
            name: name.into(),
            description: description.into(),
            fields,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_as_string")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_as_string")]
    pub example: Option<String>,
    /// Raw modifier tokens. Kept as written so the validator can reject
    /// unknown or wrongly cased values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

/// Accepts a string, number or bool and keeps its textual form, so that
/// `default: 5` and `default: "5"` decode to the same value.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, number or boolean, found {other}"
        ))),
    }
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            field_type: field_type.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Adds a modifier if it is not already present.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        if !self.has_modifier(modifier) {
            self.modifiers.push(modifier.as_str().to_string());
        }
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.iter().any(|m| m == modifier.as_str())
    }

    pub fn is_nullable(&self) -> bool {
        self.has_modifier(Modifier::Nullable)
    }

    pub fn is_array(&self) -> bool {
        self.has_modifier(Modifier::Array)
    }
}

/// A field of a resource, tagged with the operations that expose or accept it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceField {
    #[serde(flatten)]
    pub field: Field,
    pub operations: Vec<String>,
}

impl ResourceField {
    pub fn new(field: Field, operations: &[Operation]) -> Self {
        ResourceField {
            field,
            operations: operations.iter().map(|op| op.as_str().to_string()).collect(),
        }
    }

    pub fn has_operation(&self, operation: Operation) -> bool {
        self.operations.iter().any(|op| op == operation.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub operations: Vec<String>,
    pub fields: Vec<ResourceField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
    /// When set, the read object carries a single `Meta` reference instead of
    /// the identity and audit columns.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip_auto_columns: bool,
}

impl Resource {
    pub fn has_operation(&self, operation: Operation) -> bool {
        self.operations.iter().any(|op| op == operation.as_str())
    }

    pub fn has_endpoint(&self, name: &str) -> bool {
        self.endpoints.iter().any(|e| e.name == name)
    }

    pub fn get_endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Fields tagged with `operation`, projected to plain fields in declared order.
    pub fn fields_for(&self, operation: Operation) -> Vec<Field> {
        self.fields
            .iter()
            .filter(|f| f.has_operation(operation))
            .map(|f| f.field.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub method: String,
    /// Suffix appended after the resource segment, e.g. `/{id}`.
    pub path: String,
    pub request: EndpointRequest,
    pub response: EndpointResponse,
}

impl Endpoint {
    /// The complete path: the kebab-cased resource segment followed by the
    /// endpoint's own suffix. An empty resource name leaves an empty segment.
    pub fn full_path(&self, resource_name: &str) -> String {
        format!("/{}{}", to_kebab_case(resource_name), self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body_params: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointResponse {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body_fields: Vec<Field>,
    /// Name of an object returned as the whole body, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_object: Option<String>,
}

/// A single authentication scheme, modelled after OpenAPI security schemes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scheme: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bearer_format: String,
    #[serde(rename = "in", skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parameter_name: String,
}

/// A scheme as written inside a security group. The name is optional at the
/// decoding level so that a missing one surfaces as a security error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySchemeDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub scheme: SecurityScheme,
}

/// Either the pre-flattened legacy layout or named groups of schemes.
/// Groups keep their declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecurityConfig {
    Flat(FlatSecurity),
    Grouped(IndexMap<String, Vec<SecuritySchemeDecl>>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatSecurity {
    pub schemes: BTreeMap<String, SecurityScheme>,
    /// OR of AND: each inner list is one acceptable combination of schemes.
    #[serde(default)]
    pub requirements: Vec<Vec<String>>,
}

/// Client retry policy. Intervals are signed so negative values can be
/// decoded and reported by the validator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    pub strategy: String,
    pub initial_interval_ms: i64,
    pub max_interval_ms: i64,
    pub max_elapsed_time_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status_codes: Vec<String>,
    pub retry_connection_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeoutConfig {
    pub timeout_ms: i64,
}
