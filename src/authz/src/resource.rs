//! Read-only snapshot of one node of the resource store

use crate::types::{ResourcePath, Term, Triple, TypeUri};
use crate::vocab;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Resource view consumed by the engine
///
/// The container is held as a path back-reference and resolved through the
/// store session, so a node never owns its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Unique slash-delimited path
    pub path: ResourcePath,

    /// Containment depth (root = 0)
    pub depth: usize,

    /// Declared RDF types
    #[serde(default)]
    pub types: HashSet<TypeUri>,

    /// Outgoing property triples in declared order
    #[serde(default)]
    pub properties: Vec<Triple>,

    /// Path of the parent; `None` iff this is the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ResourcePath>,
}

impl ResourceNode {
    /// Create a root node (depth 0, no container)
    pub fn root(path: impl Into<ResourcePath>) -> Self {
        Self {
            path: path.into(),
            depth: 0,
            types: HashSet::new(),
            properties: Vec::new(),
            container: None,
        }
    }

    /// Create a node contained in `parent`
    pub fn child_of(parent: &ResourceNode, path: impl Into<ResourcePath>) -> Self {
        Self {
            path: path.into(),
            depth: parent.depth + 1,
            types: HashSet::new(),
            properties: Vec::new(),
            container: Some(parent.path.clone()),
        }
    }

    /// Add a declared type
    pub fn with_type(mut self, type_uri: impl Into<TypeUri>) -> Self {
        self.types.insert(type_uri.into());
        self
    }

    /// Add a property whose subject is this node's repository URI
    pub fn with_property(mut self, prefix: &str, predicate: impl Into<String>, object: Term) -> Self {
        let subject = self.uri(prefix);
        self.properties.push(Triple::new(subject, predicate, object));
        self
    }

    /// Declare an `acl:accessControl` link to the ACL at `acl_path`
    pub fn with_access_control(self, prefix: &str, acl_path: &str) -> Self {
        let target = format!("{}{}", prefix, acl_path);
        self.with_property(prefix, vocab::ACCESS_CONTROL, Term::uri(target))
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub fn has_type(&self, type_uri: &str) -> bool {
        self.types.contains(type_uri)
    }

    /// Repository URI of this node
    pub fn uri(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.path)
    }

    /// Objects of every property with the given predicate, in declared order
    pub fn objects<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.properties
            .iter()
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// The access-control link declared directly on this node.
    ///
    /// Only the first declared link counts; links are never inherited here.
    pub fn access_control_link(&self) -> Option<&str> {
        self.objects(vocab::ACCESS_CONTROL).next().map(Term::value)
    }
}
