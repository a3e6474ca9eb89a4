//! # CretoAI WebAC Role Resolution
//!
//! Resolves effective Web Access Control roles for resources in a
//! hierarchical store.
//!
//! ## Features
//!
//! - **ACL inheritance** by upward containment traversal
//! - **Path and class scoped grants** (`acl:accessTo`, `acl:accessToClass`)
//! - **Fail-closed degradation** for missing, dangling or malformed ACL data
//! - **Session-scoped reads** through an async store trait
//! - **Optional role cache** and resolution metrics
//!
//! ## Example
//!
//! ```rust
//! use cretoai_webac::{
//!     vocab, InMemoryResourceStore, ResourceNode, Term, WebAcRolesProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let prefix = vocab::DEFAULT_REPOSITORY_PREFIX;
//!     let store = InMemoryResourceStore::new();
//!
//!     let collection = ResourceNode::root("/webacl_box1").with_access_control(prefix, "/acls/01");
//!     let acl = ResourceNode::root("/acls/01");
//!     let auth = ResourceNode::child_of(&acl, "/acls/01/authorization")
//!         .with_type(vocab::AUTHORIZATION)
//!         .with_property(prefix, vocab::AGENT, Term::literal("smith123"))
//!         .with_property(prefix, vocab::MODE, Term::uri(vocab::MODE_READ))
//!         .with_property(prefix, vocab::ACCESS_TO, Term::uri("info:fedora/webacl_box1"));
//!
//!     store.put(collection).await?;
//!     store.put(acl).await?;
//!     store.put(auth).await?;
//!
//!     let provider = WebAcRolesProvider::default();
//!     let roles = provider.resolve_roles_at(&store, "/webacl_box1").await?;
//!
//!     assert!(roles.has_mode("smith123", vocab::MODE_READ));
//!     Ok(())
//! }
//! ```

pub mod acl;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod resource;
pub mod roles;
pub mod store;
pub mod types;
pub mod vocab;

// Re-export commonly used types
pub use acl::{AclLocator, Authorization, AuthorizationLoader, AuthorizationParser, LocatedAcl};
pub use delegate::AuthorizationDelegate;
pub use engine::{CacheConfig, EngineConfig, EngineMetrics, WebAcRolesProvider};
pub use error::{Result, WebAcError};
pub use resource::ResourceNode;
pub use roles::{aggregate, RoleMap};
pub use store::{InMemoryResourceStore, ResourceStore, StoreFixture, StoreSession};
pub use types::{ModeUri, PrincipalId, ResourcePath, Term, Triple, TypeUri};
pub use vocab::AccessMode;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
