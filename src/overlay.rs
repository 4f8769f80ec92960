//! The expansion pipeline.
//!
//! Each [`Stage`] takes the previous tree and returns a new one; nothing is
//! shared between stages except the tree itself. Every stage skips names
//! that already exist, so expanding an expanded service is a no-op.

use crate::model::Service;
use crate::utils::{EnglishPluralizer, Pluralizer};
use crate::{defaults, endpoints, filters, materialize, request_errors};

pub trait Stage {
    fn name(&self) -> &'static str;
    fn apply(&self, service: &Service) -> Service;
}

pub struct DefaultCatalog;

impl Stage for DefaultCatalog {
    fn name(&self) -> &'static str {
        "defaults"
    }

    fn apply(&self, service: &Service) -> Service {
        defaults::inject(service)
    }
}

pub struct Materialize;

impl Stage for Materialize {
    fn name(&self) -> &'static str {
        "materialize"
    }

    fn apply(&self, service: &Service) -> Service {
        materialize::materialize(service)
    }
}

pub struct Filters;

impl Stage for Filters {
    fn name(&self) -> &'static str {
        "filters"
    }

    fn apply(&self, service: &Service) -> Service {
        filters::generate(service)
    }
}

pub struct Endpoints<P> {
    pluralizer: P,
}

impl<P: Pluralizer> Stage for Endpoints<P> {
    fn name(&self) -> &'static str {
        "endpoints"
    }

    fn apply(&self, service: &Service) -> Service {
        endpoints::synthesize(service, &self.pluralizer)
    }
}

pub struct RequestErrors;

impl Stage for RequestErrors {
    fn name(&self) -> &'static str {
        "request_errors"
    }

    fn apply(&self, service: &Service) -> Service {
        request_errors::generate(service)
    }
}

/// The ordered stage list: defaults, read objects, filters, endpoints,
/// request errors.
pub struct Overlay {
    stages: Vec<Box<dyn Stage>>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::with_pluralizer(EnglishPluralizer)
    }

    pub fn with_pluralizer<P: Pluralizer + 'static>(pluralizer: P) -> Self {
        Overlay {
            stages: vec![
                Box::new(DefaultCatalog),
                Box::new(Materialize),
                Box::new(Filters),
                Box::new(Endpoints { pluralizer }),
                Box::new(RequestErrors),
            ],
        }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn expand(&self, input: &Service) -> Service {
        let mut service = input.clone();
        for stage in &self.stages {
            service = stage.apply(&service);
            log::debug!(
                "stage '{}' done: {} objects, {} enums",
                stage.name(),
                service.objects.len(),
                service.enums.len()
            );
        }
        service
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands `service` with the default English pluralizer.
pub fn expand(service: &Service) -> Service {
    Overlay::new().expand(service)
}
