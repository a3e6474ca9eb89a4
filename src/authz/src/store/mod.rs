//! Resource store read interface
//!
//! The engine never touches process-wide state: every resolution reads
//! through a [`StoreSession`], a consistent view opened from a
//! [`ResourceStore`] and passed explicitly down the pipeline.

use crate::error::Result;
use crate::resource::ResourceNode;
use async_trait::async_trait;
use std::sync::Arc;

pub mod fixture;
pub mod memory;

pub use fixture::{PropertySpec, ResourceSpec, StoreFixture};
pub use memory::{InMemoryResourceStore, MemorySession};

/// A consistent read view of the store for the duration of one resolution
#[async_trait]
pub trait StoreSession: Send + Sync {
    /// Look up a node by path
    async fn find(&self, path: &str) -> Result<Option<ResourceNode>>;

    /// Children of the node at `path` in the store's iteration order.
    ///
    /// Unknown paths yield an empty list.
    async fn children(&self, path: &str) -> Result<Vec<ResourceNode>>;
}

/// Source of store sessions
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Open a new read session
    async fn session(&self) -> Result<Arc<dyn StoreSession>>;
}
