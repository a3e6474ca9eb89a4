//! Authorization records and their parsing from resource properties

use crate::resource::ResourceNode;
use crate::types::{uri_to_path, ModeUri, PrincipalId, ResourcePath, Term, TypeUri};
use crate::vocab::{self, AccessMode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One access grant parsed from one ACL child
///
/// Every collection is always present; an undeclared predicate is an empty
/// set. A record missing principals, modes or targets is inert: it loads
/// fine but can never contribute a grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// `acl:agent` values
    #[serde(default)]
    pub agents: HashSet<PrincipalId>,

    /// `acl:agentClass` values
    #[serde(default)]
    pub agent_classes: HashSet<PrincipalId>,

    /// `acl:mode` values
    #[serde(default)]
    pub modes: HashSet<ModeUri>,

    /// `acl:accessTo` targets as store paths
    #[serde(default)]
    pub access_to: HashSet<ResourcePath>,

    /// `acl:accessToClass` type identifiers
    #[serde(default)]
    pub access_to_class: HashSet<TypeUri>,
}

impl Authorization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, agent: impl Into<PrincipalId>) -> Self {
        self.agents.insert(agent.into());
        self
    }

    pub fn with_agent_class(mut self, class: impl Into<PrincipalId>) -> Self {
        self.agent_classes.insert(class.into());
        self
    }

    pub fn with_mode(mut self, mode: impl Into<ModeUri>) -> Self {
        self.modes.insert(mode.into());
        self
    }

    pub fn with_access_to(mut self, path: impl Into<ResourcePath>) -> Self {
        self.access_to.insert(path.into());
        self
    }

    pub fn with_access_to_class(mut self, type_uri: impl Into<TypeUri>) -> Self {
        self.access_to_class.insert(type_uri.into());
        self
    }

    /// Agents and agent classes together; both share one identifier namespace
    pub fn principals(&self) -> impl Iterator<Item = &PrincipalId> {
        self.agents.iter().chain(self.agent_classes.iter())
    }

    /// True when this record can never contribute a grant
    pub fn is_inert(&self) -> bool {
        (self.agents.is_empty() && self.agent_classes.is_empty())
            || self.modes.is_empty()
            || (self.access_to.is_empty() && self.access_to_class.is_empty())
    }

    /// Granted modes outside the four WebAC modes.
    ///
    /// They are still granted verbatim; enforcers simply never ask for them.
    pub fn unrecognized_modes(&self) -> impl Iterator<Item = &ModeUri> {
        self.modes.iter().filter(|mode| AccessMode::from_uri(mode).is_none())
    }
}

/// Extracts an [`Authorization`] from a node already classified as one
pub trait AuthorizationParser: Send + Sync {
    fn parse(&self, node: &ResourceNode) -> Authorization;
}

/// Parser reading the WebAC predicates from a node's property triples
#[derive(Debug, Clone)]
pub struct TripleAuthorizationParser {
    repository_prefix: String,
}

impl TripleAuthorizationParser {
    pub fn new(repository_prefix: impl Into<String>) -> Self {
        Self {
            repository_prefix: repository_prefix.into(),
        }
    }

    fn values(node: &ResourceNode, predicate: &str) -> HashSet<String> {
        node.objects(predicate).map(|t| t.value().to_string()).collect()
    }
}

impl Default for TripleAuthorizationParser {
    fn default() -> Self {
        Self::new(vocab::DEFAULT_REPOSITORY_PREFIX)
    }
}

impl AuthorizationParser for TripleAuthorizationParser {
    fn parse(&self, node: &ResourceNode) -> Authorization {
        let access_to = node
            .objects(vocab::ACCESS_TO)
            .map(|t| match t {
                Term::Uri(uri) => uri_to_path(uri, &self.repository_prefix),
                Term::Literal(path) => path.clone(),
            })
            .collect();

        Authorization {
            agents: Self::values(node, vocab::AGENT),
            agent_classes: Self::values(node, vocab::AGENT_CLASS),
            modes: Self::values(node, vocab::MODE),
            access_to,
            access_to_class: Self::values(node, vocab::ACCESS_TO_CLASS),
        }
    }
}
