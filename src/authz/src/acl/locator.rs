//! Nearest-ACL discovery by upward containment traversal

use crate::error::Result;
use crate::resource::ResourceNode;
use crate::store::StoreSession;
use crate::types::{uri_to_path, ResourcePath};
use tracing::{debug, warn};

/// An ACL resolved for some resource
#[derive(Debug, Clone)]
pub struct LocatedAcl {
    /// The governing ACL resource
    pub acl: ResourceNode,

    /// Path of the node that declared the link; `accessTo` matches against it
    pub subject_path: ResourcePath,
}

/// Walks the containment chain looking for an `acl:accessControl` link
#[derive(Debug, Clone)]
pub struct AclLocator {
    repository_prefix: String,
}

impl AclLocator {
    pub fn new(repository_prefix: impl Into<String>) -> Self {
        Self {
            repository_prefix: repository_prefix.into(),
        }
    }

    /// Find the ACL governing `resource`.
    ///
    /// Returns `Ok(None)` when the root is reached without a link, when the
    /// nearest link dangles, or when the chain is broken. Only store read
    /// failures are errors.
    pub async fn locate(
        &self,
        session: &dyn StoreSession,
        resource: &ResourceNode,
    ) -> Result<Option<LocatedAcl>> {
        let mut current = resource.clone();
        let mut steps = 0usize;

        loop {
            if let Some(link) = current.access_control_link() {
                let acl_path = uri_to_path(link, &self.repository_prefix);

                return match session.find(&acl_path).await? {
                    Some(acl) => {
                        debug!("ACL {} governs {} (declared on {})", acl.path, resource.path, current.path);
                        Ok(Some(LocatedAcl {
                            acl,
                            subject_path: current.path.clone(),
                        }))
                    }
                    None => {
                        warn!("Dangling access control link on {}: {} does not exist", current.path, link);
                        Ok(None)
                    }
                };
            }

            if current.is_root() {
                debug!("No ACL found for {}", resource.path);
                return Ok(None);
            }

            steps += 1;
            if steps > resource.depth {
                warn!("Containment chain of {} is deeper than its depth {}", resource.path, resource.depth);
                return Ok(None);
            }

            let Some(parent) = current.container.as_deref() else {
                warn!("Resource {} at depth {} has no container", current.path, current.depth);
                return Ok(None);
            };

            current = match session.find(parent).await? {
                Some(node) => node,
                None => {
                    warn!("Container {} of {} is missing from the store", parent, current.path);
                    return Ok(None);
                }
            };
        }
    }
}
