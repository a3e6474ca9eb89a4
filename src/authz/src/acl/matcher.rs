//! Authorization matching against a subject path and a type set

use super::authorization::Authorization;
use crate::types::TypeUri;
use std::collections::HashSet;

/// Decide whether `auth` applies.
///
/// `subject_path` is the node the governing ACL was declared on, not the
/// queried resource when the ACL was inherited. `resource_types` are the
/// queried resource's own types.
pub fn matches(auth: &Authorization, subject_path: &str, resource_types: &HashSet<TypeUri>) -> bool {
    auth.access_to.contains(subject_path) || !auth.access_to_class.is_disjoint(resource_types)
}
