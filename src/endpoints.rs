//! Synthesizes the standard endpoints of every resource.
//!
//! Each kind is gated on one resource operation. A kind is skipped when the
//! gate is missing or when the resource already declares an endpoint with the
//! standard name, so hand-written endpoints always win.

use crate::defaults::PAGINATION;
use crate::filters::filter_name;
use crate::model::{Endpoint, EndpointRequest, EndpointResponse, Field, Resource, Service};
use crate::types::{Modifier, Operation, Primitive};
use crate::utils::Pluralizer;

pub const CREATE: &str = "Create";
pub const UPDATE: &str = "Update";
pub const DELETE: &str = "Delete";
pub const GET: &str = "Get";
pub const LIST: &str = "List";
pub const SEARCH: &str = "Search";

const JSON: &str = "application/json";
const DEFAULT_LIMIT: &str = "50";
const DEFAULT_OFFSET: &str = "0";

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Create,
    Update,
    Delete,
    Get,
    List,
    Search,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 6] = [
        EndpointKind::Create,
        EndpointKind::Update,
        EndpointKind::Delete,
        EndpointKind::Get,
        EndpointKind::List,
        EndpointKind::Search,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EndpointKind::Create => CREATE,
            EndpointKind::Update => UPDATE,
            EndpointKind::Delete => DELETE,
            EndpointKind::Get => GET,
            EndpointKind::List => LIST,
            EndpointKind::Search => SEARCH,
        }
    }

    pub fn gate(self) -> Operation {
        match self {
            EndpointKind::Create => Operation::Create,
            EndpointKind::Update => Operation::Update,
            EndpointKind::Delete => Operation::Delete,
            EndpointKind::Get | EndpointKind::List | EndpointKind::Search => Operation::Read,
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            EndpointKind::Create | EndpointKind::Search => "POST",
            EndpointKind::Update => "PATCH",
            EndpointKind::Delete => "DELETE",
            EndpointKind::Get | EndpointKind::List => "GET",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            EndpointKind::Create | EndpointKind::List => "",
            EndpointKind::Update | EndpointKind::Delete | EndpointKind::Get => "/{id}",
            EndpointKind::Search => "/_search",
        }
    }

    pub fn status_code(self) -> u16 {
        match self {
            EndpointKind::Create => 201,
            EndpointKind::Delete => 204,
            _ => 200,
        }
    }
}

fn id_param(resource: &Resource) -> Field {
    Field::new("id", Primitive::Uuid.as_str())
        .with_description(format!("Identifier of the {} entry.", resource.name))
        .with_example(Primitive::Uuid.example())
}

fn paging_params(plural: &str) -> Vec<Field> {
    vec![
        Field::new("limit", Primitive::Int.as_str())
            .with_description(format!("Maximum number of {plural} to return."))
            .with_default(DEFAULT_LIMIT),
        Field::new("offset", Primitive::Int.as_str())
            .with_description(format!("Number of {plural} to skip before the first result."))
            .with_default(DEFAULT_OFFSET),
    ]
}

fn page_fields(resource: &Resource, plural: &str) -> Vec<Field> {
    vec![
        Field::new("data", resource.name.clone())
            .with_description(format!("The matching {plural}."))
            .with_modifier(Modifier::Array),
        Field::new("pagination", PAGINATION).with_description("Position of this page."),
    ]
}

/// Builds the endpoint of `kind` for `resource`, ignoring gating.
pub fn build_endpoint(kind: EndpointKind, resource: &Resource, pluralizer: &dyn Pluralizer) -> Endpoint {
    let name = &resource.name;
    let plural = pluralizer.pluralize(name);

    let (title, description) = match kind {
        EndpointKind::Create => (
            format!("Create {name}"),
            format!("Creates a new {name} entry and returns it."),
        ),
        EndpointKind::Update => (
            format!("Update {name}"),
            format!("Applies a partial update to an existing {name} entry."),
        ),
        EndpointKind::Delete => (
            format!("Delete {name}"),
            format!("Removes an existing {name} entry."),
        ),
        EndpointKind::Get => (
            format!("Get {name}"),
            format!("Returns a single {name} entry by its identifier."),
        ),
        EndpointKind::List => (
            format!("List {plural}"),
            format!("Returns a page of {plural}."),
        ),
        EndpointKind::Search => (
            format!("Search {plural}"),
            format!("Returns a page of {plural} matching the given filter."),
        ),
    };

    let mut request = EndpointRequest::default();
    let mut response = EndpointResponse {
        status_code: kind.status_code(),
        ..Default::default()
    };

    match kind {
        EndpointKind::Create | EndpointKind::Update => {
            request.content_type = JSON.to_string();
            request.body_params = resource.fields_for(kind.gate());
        }
        EndpointKind::Search => {
            request.content_type = JSON.to_string();
            request.body_params = vec![Field::new("Filter", filter_name(name))
                .with_description(format!("Conditions the returned {plural} must satisfy."))];
        }
        EndpointKind::Delete | EndpointKind::Get | EndpointKind::List => {}
    }

    if matches!(
        kind,
        EndpointKind::Update | EndpointKind::Delete | EndpointKind::Get
    ) {
        request.path_params = vec![id_param(resource)];
    }

    match kind {
        EndpointKind::Create | EndpointKind::Update | EndpointKind::Get => {
            response.content_type = JSON.to_string();
            response.body_object = Some(name.clone());
        }
        EndpointKind::List | EndpointKind::Search => {
            request.query_params = paging_params(&plural);
            response.content_type = JSON.to_string();
            response.body_fields = page_fields(resource, &plural);
        }
        EndpointKind::Delete => {}
    }

    Endpoint {
        name: kind.name().to_string(),
        title: title.clone(),
        summary: title,
        description,
        method: kind.method().to_string(),
        path: kind.path().to_string(),
        request,
        response,
    }
}

/// Appends the missing standard endpoints to each resource. A resource
/// without a read object (no Read operation) gets no response body object.
pub fn synthesize(input: &Service, pluralizer: &dyn Pluralizer) -> Service {
    let mut service = input.clone();
    let mut added = 0;

    for resource in &mut service.resources {
        let has_read_object = input.has_object(&resource.name);
        for kind in EndpointKind::ALL {
            if !resource.has_operation(kind.gate()) {
                continue;
            }
            if resource.has_endpoint(kind.name()) {
                log::trace!(
                    "resource '{}' already declares '{}', keeping it",
                    resource.name,
                    kind.name()
                );
                continue;
            }
            let mut endpoint = build_endpoint(kind, resource, pluralizer);
            if !has_read_object {
                endpoint.response.body_object = None;
            }
            resource.endpoints.push(endpoint);
            added += 1;
        }
    }

    log::debug!("endpoint synthesis: added {added} endpoints");
    service
}
