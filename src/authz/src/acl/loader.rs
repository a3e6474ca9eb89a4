//! Authorization loading from an ACL's children

use super::authorization::{Authorization, AuthorizationParser, TripleAuthorizationParser};
use crate::error::Result;
use crate::resource::ResourceNode;
use crate::store::StoreSession;
use crate::vocab;
use std::sync::Arc;
use tracing::{debug, warn};

/// Enumerates the Authorization-typed children of an ACL
#[derive(Clone)]
pub struct AuthorizationLoader {
    parser: Arc<dyn AuthorizationParser>,
}

impl AuthorizationLoader {
    /// Loader using the triple parser for `repository_prefix`
    pub fn new(repository_prefix: impl Into<String>) -> Self {
        Self::with_parser(Arc::new(TripleAuthorizationParser::new(repository_prefix)))
    }

    pub fn with_parser(parser: Arc<dyn AuthorizationParser>) -> Self {
        Self { parser }
    }

    /// Parse every child of `acl` typed `acl:Authorization`, in child order.
    ///
    /// Other children are skipped. Malformed records come back inert.
    pub async fn load(&self, session: &dyn StoreSession, acl: &ResourceNode) -> Result<Vec<Authorization>> {
        let children = session.children(&acl.path).await?;
        let total = children.len();

        let authorizations: Vec<Authorization> = children
            .iter()
            .filter(|child| child.has_type(vocab::AUTHORIZATION))
            .map(|child| {
                let auth = self.parser.parse(child);
                if auth.is_inert() {
                    warn!("Authorization {} grants nothing", child.path);
                }
                for mode in auth.unrecognized_modes() {
                    warn!("Authorization {} grants non-WebAC mode {}", child.path, mode);
                }
                auth
            })
            .collect();

        debug!(
            "Loaded {} authorizations from {} ({} children)",
            authorizations.len(),
            acl.path,
            total
        );

        Ok(authorizations)
    }
}
