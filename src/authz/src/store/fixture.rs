//! JSON store fixtures
//!
//! A fixture lists resources parent-first; depth is derived from the
//! container chain.
//!
//! ```json
//! {
//!   "resources": [
//!     { "path": "/webacl_box1", "access_control": "/acls/01" },
//!     { "path": "/acls/01" },
//!     {
//!       "path": "/acls/01/authorization",
//!       "container": "/acls/01",
//!       "types": ["http://www.w3.org/ns/auth/acl#Authorization"],
//!       "properties": [
//!         { "predicate": "http://www.w3.org/ns/auth/acl#agent",
//!           "object": { "kind": "literal", "value": "smith123" } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use super::memory::InMemoryResourceStore;
use crate::error::{Result, WebAcError};
use crate::resource::ResourceNode;
use crate::types::{ResourcePath, Term, TypeUri};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// One property of a fixture resource; the subject is the resource itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySpec {
    pub predicate: String,
    pub object: Term,
}

/// One resource of a fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub path: ResourcePath,

    #[serde(default)]
    pub container: Option<ResourcePath>,

    #[serde(default)]
    pub types: Vec<TypeUri>,

    /// Shorthand for an `acl:accessControl` property targeting this ACL path
    #[serde(default)]
    pub access_control: Option<ResourcePath>,

    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

/// A serialized store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFixture {
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

impl StoreFixture {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Convert every resource entry into a node, deriving depths from containers
    pub fn nodes(&self, prefix: &str) -> Result<Vec<ResourceNode>> {
        let mut depths: HashMap<&str, usize> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.resources.len());

        for spec in &self.resources {
            let depth = match &spec.container {
                None => 0,
                Some(parent) => {
                    let parent_depth = depths.get(parent.as_str()).ok_or_else(|| {
                        WebAcError::InvalidInput(format!(
                            "Resource '{}' listed before its container '{}'",
                            spec.path, parent
                        ))
                    })?;
                    parent_depth + 1
                }
            };
            depths.insert(spec.path.as_str(), depth);

            let mut node = ResourceNode {
                path: spec.path.clone(),
                depth,
                types: spec.types.iter().cloned().collect(),
                properties: Vec::new(),
                container: spec.container.clone(),
            };
            if let Some(acl) = &spec.access_control {
                node = node.with_access_control(prefix, acl);
            }
            for prop in &spec.properties {
                node = node.with_property(prefix, prop.predicate.clone(), prop.object.clone());
            }
            nodes.push(node);
        }

        Ok(nodes)
    }

    /// Build an in-memory store holding this fixture
    pub async fn into_store(&self, prefix: &str) -> Result<InMemoryResourceStore> {
        let store = InMemoryResourceStore::new();
        for node in self.nodes(prefix)? {
            store.put(node).await?;
        }

        info!("Loaded fixture with {} resources", self.resources.len());
        Ok(store)
    }
}
