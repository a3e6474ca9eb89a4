//! ACL discovery, authorization loading and matching

pub mod authorization;
pub mod loader;
pub mod locator;
pub mod matcher;

pub use authorization::{Authorization, AuthorizationParser, TripleAuthorizationParser};
pub use loader::AuthorizationLoader;
pub use locator::{AclLocator, LocatedAcl};
pub use matcher::matches;
