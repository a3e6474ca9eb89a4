//! Enforcement helper over a resolved role map
//!
//! Role resolution says who holds which modes. This module answers the
//! request-time question "may these principals do this", which is plain set
//! membership against the [`RoleMap`].

use crate::roles::RoleMap;
use crate::vocab::FOAF_AGENT;
use tracing::debug;

/// Allow-only permission check
#[derive(Debug, Clone)]
pub struct AuthorizationDelegate {
    /// Agent class every caller belongs to
    public_class: String,
}

impl AuthorizationDelegate {
    pub fn new() -> Self {
        Self {
            public_class: FOAF_AGENT.to_string(),
        }
    }

    /// Use a different public agent class
    pub fn with_public_class(public_class: impl Into<String>) -> Self {
        Self {
            public_class: public_class.into(),
        }
    }

    /// True iff every mode in `required_modes` is granted to at least one of
    /// `principals` or to the public class.
    ///
    /// An empty mode list is never permitted.
    pub fn roles_have_permission<P, M>(&self, roles: &RoleMap, principals: &[P], required_modes: &[M]) -> bool
    where
        P: AsRef<str>,
        M: AsRef<str>,
    {
        if required_modes.is_empty() || roles.is_empty() {
            return false;
        }

        let names: Vec<&str> = principals.iter().map(|p| p.as_ref()).collect();
        let modes: Vec<&str> = required_modes.iter().map(|m| m.as_ref()).collect();

        let permitted = modes.iter().all(|mode| {
            names
                .iter()
                .chain(std::iter::once(&self.public_class.as_str()))
                .any(|principal| roles.has_mode(principal, mode))
        });

        debug!("Permission check for {:?} on modes {:?}: {}", names, modes, permitted);

        permitted
    }
}

impl Default for AuthorizationDelegate {
    fn default() -> Self {
        Self::new()
    }
}
