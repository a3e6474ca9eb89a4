//! Core identifier and triple types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slash-delimited resource path (e.g., "/webacl_box1/foo")
pub type ResourcePath = String;

/// Type identifier URI
pub type TypeUri = String;

/// Access mode URI (e.g., "http://www.w3.org/ns/auth/acl#Read")
pub type ModeUri = String;

/// Principal identifier: an agent id or an agent-class id
pub type PrincipalId = String;

/// Object position of a property triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Term {
    /// URI reference
    Uri(String),

    /// Plain literal
    Literal(String),
}

impl Term {
    /// Create a URI term
    pub fn uri(value: impl Into<String>) -> Self {
        Self::Uri(value.into())
    }

    /// Create a literal term
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Lexical value regardless of term kind
    pub fn value(&self) -> &str {
        match self {
            Self::Uri(v) | Self::Literal(v) => v,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(v) => write!(f, "<{}>", v),
            Self::Literal(v) => write!(f, "\"{}\"", v),
        }
    }
}

/// One outgoing property of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject URI
    pub subject: String,

    /// Predicate URI
    pub predicate: String,

    /// Object term
    pub object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// Strip `prefix` from a repository URI to obtain a store path.
///
/// Values outside the repository namespace are returned unchanged.
pub fn uri_to_path(uri: &str, prefix: &str) -> ResourcePath {
    if prefix.is_empty() {
        return uri.to_string();
    }

    match uri.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => uri.to_string(),
    }
}
