//! Normalizes the two accepted security layouts into one scheme catalog and
//! an OR-of-AND requirement list.

use crate::error::SecurityConfigError;
use crate::model::{SecurityConfig, SecurityScheme};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProcessedSecurity {
    pub schemes: BTreeMap<String, SecurityScheme>,
    /// Each entry is one acceptable combination; all keys in it are required.
    pub requirements: Vec<Vec<String>>,
}

impl ProcessedSecurity {
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty() && self.requirements.is_empty()
    }
}

/// Key under which a grouped scheme is registered.
pub fn scheme_key(group: &str, name: &str) -> String {
    format!("{group}_{name}")
}

pub fn process(config: Option<&SecurityConfig>) -> Result<ProcessedSecurity, SecurityConfigError> {
    let Some(config) = config else {
        return Ok(ProcessedSecurity::default());
    };

    match config {
        SecurityConfig::Flat(flat) => Ok(ProcessedSecurity {
            schemes: flat.schemes.clone(),
            requirements: flat.requirements.clone(),
        }),
        SecurityConfig::Grouped(groups) => {
            let mut processed = ProcessedSecurity::default();
            for (group, decls) in groups {
                let mut requirement = Vec::with_capacity(decls.len());
                for (index, decl) in decls.iter().enumerate() {
                    let name = decl.name.as_deref().filter(|n| !n.is_empty()).ok_or_else(|| {
                        SecurityConfigError::MissingName {
                            group: group.clone(),
                            index: index + 1,
                        }
                    })?;
                    let key = scheme_key(group, name);
                    processed.schemes.insert(key.clone(), decl.scheme.clone());
                    requirement.push(key);
                }
                processed.requirements.push(requirement);
            }
            log::debug!(
                "security: {} schemes in {} groups",
                processed.schemes.len(),
                processed.requirements.len()
            );
            Ok(processed)
        }
    }
}
