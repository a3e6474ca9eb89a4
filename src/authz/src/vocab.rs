//! WebAC and FOAF identifiers used by the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// WebAC namespace
pub const WEBAC_NAMESPACE: &str = "http://www.w3.org/ns/auth/acl#";

/// Link from a resource to the ACL governing it
pub const ACCESS_CONTROL: &str = "http://www.w3.org/ns/auth/acl#accessControl";

/// Type of an authorization record
pub const AUTHORIZATION: &str = "http://www.w3.org/ns/auth/acl#Authorization";

pub const AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
pub const AGENT_CLASS: &str = "http://www.w3.org/ns/auth/acl#agentClass";
pub const MODE: &str = "http://www.w3.org/ns/auth/acl#mode";
pub const ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
pub const ACCESS_TO_CLASS: &str = "http://www.w3.org/ns/auth/acl#accessToClass";

pub const MODE_READ: &str = "http://www.w3.org/ns/auth/acl#Read";
pub const MODE_WRITE: &str = "http://www.w3.org/ns/auth/acl#Write";
pub const MODE_APPEND: &str = "http://www.w3.org/ns/auth/acl#Append";
pub const MODE_CONTROL: &str = "http://www.w3.org/ns/auth/acl#Control";

/// The public agent class: every principal belongs to it
pub const FOAF_AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";

/// Default URI prefix of repository resources
pub const DEFAULT_REPOSITORY_PREFIX: &str = "info:fedora";

/// Well-known WebAC access modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
    Append,
    Control,
}

impl AccessMode {
    /// All modes in declaration order
    pub const ALL: [AccessMode; 4] = [Self::Read, Self::Write, Self::Append, Self::Control];

    /// Mode URI as it appears in `acl:mode`
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Read => MODE_READ,
            Self::Write => MODE_WRITE,
            Self::Append => MODE_APPEND,
            Self::Control => MODE_CONTROL,
        }
    }

    /// Parse a mode URI; unknown modes return `None`
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.uri() == uri)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Append => "append",
            Self::Control => "control",
        };
        write!(f, "{}", name)
    }
}
