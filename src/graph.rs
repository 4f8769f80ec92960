//! Reachability over the object-type graph.
//!
//! Object types may reference each other in cycles, so every traversal
//! records visited type names before descending.

use crate::model::{Field, Service};
use crate::types::is_primitive;
use std::collections::BTreeSet;

/// Type names in first-seen order, with a set for membership checks.
#[derive(Debug, Default, Clone)]
pub struct Reachable {
    order: Vec<String>,
    visited: BTreeSet<String>,
}

impl Reachable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.visited.contains(type_name)
    }

    /// Names in the order they were first reached.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Adds every type referenced by `fields`, following object fields
    /// transitively. Primitives are not recorded.
    pub fn collect(&mut self, service: &Service, fields: &[Field]) {
        for field in fields {
            self.visit(service, &field.field_type);
        }
    }

    /// Adds `type_name` and, for objects, everything its fields reference.
    pub fn visit(&mut self, service: &Service, type_name: &str) {
        if is_primitive(type_name) || !self.visited.insert(type_name.to_string()) {
            return;
        }
        self.order.push(type_name.to_string());
        if let Some(object) = service.get_object(type_name) {
            for field in &object.fields {
                self.visit(service, &field.field_type);
            }
        }
    }
}

/// All types reachable from `fields` in `service`.
pub fn collect_reachable(service: &Service, fields: &[Field]) -> Reachable {
    let mut reachable = Reachable::new();
    reachable.collect(service, fields);
    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Object;

    fn cyclic_service() -> Service {
        Service {
            objects: vec![
                Object::new("A", "", vec![Field::new("b", "B"), Field::new("n", "Int")]),
                Object::new("B", "", vec![Field::new("a", "A"), Field::new("s", "Status")]),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_cycle_terminates() {
        let service = cyclic_service();
        let reachable = collect_reachable(&service, &[Field::new("root", "A")]);
        assert_eq!(reachable.names(), ["A", "B", "Status"]);
    }

    #[test]
    fn test_primitives_are_not_recorded() {
        let service = cyclic_service();
        let reachable = collect_reachable(&service, &[Field::new("id", "UUID")]);
        assert!(reachable.is_empty());
    }

    #[test]
    fn test_self_reference() {
        let service = Service {
            objects: vec![Object::new("Node", "", vec![Field::new("next", "Node")])],
            ..Default::default()
        };
        let reachable = collect_reachable(&service, &[Field::new("head", "Node")]);
        assert_eq!(reachable.len(), 1);
        assert!(reachable.contains("Node"));
    }
}
