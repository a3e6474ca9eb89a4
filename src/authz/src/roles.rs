//! Resolved role maps and grant aggregation

use crate::acl::Authorization;
use crate::types::{ModeUri, PrincipalId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Principal identifier → modes granted on one resource
///
/// Agents and agent classes share the key namespace. A missing key means no
/// grant was found, which an allow-only enforcer must treat as deny. Keys are
/// only ever present with a non-empty mode set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMap(HashMap<PrincipalId, BTreeSet<ModeUri>>);

impl RoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Modes granted to `principal`, if any
    pub fn modes(&self, principal: &str) -> Option<&BTreeSet<ModeUri>> {
        self.0.get(principal)
    }

    pub fn contains_principal(&self, principal: &str) -> bool {
        self.0.contains_key(principal)
    }

    /// Whether `principal` holds `mode`
    pub fn has_mode(&self, principal: &str, mode: &str) -> bool {
        self.0.get(principal).is_some_and(|modes| modes.contains(mode))
    }

    pub fn principals(&self) -> impl Iterator<Item = &PrincipalId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PrincipalId, &BTreeSet<ModeUri>)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> HashMap<PrincipalId, BTreeSet<ModeUri>> {
        self.0
    }

    /// Union `modes` into every principal of `auth`
    fn grant(&mut self, auth: &Authorization) {
        if auth.modes.is_empty() {
            return;
        }

        for principal in auth.principals() {
            self.0
                .entry(principal.clone())
                .or_default()
                .extend(auth.modes.iter().cloned());
        }
    }
}

impl<'a> IntoIterator for &'a RoleMap {
    type Item = (&'a PrincipalId, &'a BTreeSet<ModeUri>);
    type IntoIter = std::collections::hash_map::Iter<'a, PrincipalId, BTreeSet<ModeUri>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Fold matching authorizations into one role map.
///
/// Grants combine by union, so the order of `matching` is irrelevant.
pub fn aggregate<'a, I>(matching: I) -> RoleMap
where
    I: IntoIterator<Item = &'a Authorization>,
{
    let mut roles = RoleMap::new();
    for auth in matching {
        roles.grant(auth);
    }
    roles
}
