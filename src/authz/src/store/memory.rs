//! In-memory resource store with snapshot sessions

use super::{ResourceStore, StoreSession};
use crate::error::{Result, WebAcError};
use crate::resource::ResourceNode;
use crate::types::ResourcePath;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct StoreState {
    nodes: HashMap<ResourcePath, ResourceNode>,

    /// Child paths per container, in insertion order
    children: HashMap<ResourcePath, Vec<ResourcePath>>,
}

impl StoreState {
    fn subtree(&self, path: &str) -> Vec<ResourcePath> {
        let mut paths = vec![path.to_string()];
        let mut i = 0;
        while i < paths.len() {
            if let Some(kids) = self.children.get(&paths[i]) {
                paths.extend(kids.iter().cloned());
            }
            i += 1;
        }
        paths
    }
}

/// In-memory resource store
///
/// Writes are copy-on-write: a session keeps the snapshot it was opened on,
/// so mutations made afterwards are never visible to a resolution in flight.
pub struct InMemoryResourceStore {
    state: Arc<RwLock<Arc<StoreState>>>,
}

impl InMemoryResourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(Arc::new(StoreState::default()))),
        }
    }

    /// Insert or replace a node.
    ///
    /// A replaced node keeps its position among its siblings unless it moves
    /// to another container, where it is appended.
    pub async fn put(&self, node: ResourceNode) -> Result<()> {
        let mut guard = self.state.write().await;
        let state = Arc::make_mut(&mut *guard);

        match &node.container {
            None if node.depth != 0 => {
                return Err(WebAcError::InvalidInput(format!(
                    "Resource '{}' has depth {} but no container",
                    node.path, node.depth
                )));
            }
            Some(_) if node.depth == 0 => {
                return Err(WebAcError::InvalidInput(format!(
                    "Root resource '{}' cannot have a container",
                    node.path
                )));
            }
            Some(parent) => {
                if let Some(parent_node) = state.nodes.get(parent) {
                    if parent_node.depth + 1 != node.depth {
                        return Err(WebAcError::InvalidInput(format!(
                            "Resource '{}' has depth {} but its container '{}' has depth {}",
                            node.path, node.depth, parent, parent_node.depth
                        )));
                    }
                }

                let siblings = state.children.entry(parent.clone()).or_default();
                if !siblings.contains(&node.path) {
                    siblings.push(node.path.clone());
                }
            }
            None => {}
        }

        // A node moved to another container leaves its old sibling list
        let previous = state.nodes.get(&node.path).and_then(|old| old.container.clone());
        if let Some(old_parent) = previous.filter(|old| node.container.as_ref() != Some(old)) {
            if let Some(siblings) = state.children.get_mut(&old_parent) {
                siblings.retain(|p| p != &node.path);
            }
        }

        debug!("Stored resource {}", node.path);
        state.nodes.insert(node.path.clone(), node);
        Ok(())
    }

    /// Remove a node and everything contained beneath it.
    ///
    /// Returns the number of nodes removed.
    pub async fn remove(&self, path: &str) -> Result<usize> {
        let mut guard = self.state.write().await;
        let state = Arc::make_mut(&mut *guard);

        let Some(node) = state.nodes.get(path) else {
            return Ok(0);
        };

        if let Some(parent) = node.container.clone() {
            if let Some(siblings) = state.children.get_mut(&parent) {
                siblings.retain(|p| p != path);
            }
        }

        let doomed = state.subtree(path);
        let mut removed = 0;
        for p in &doomed {
            if state.nodes.remove(p).is_some() {
                removed += 1;
            }
            state.children.remove(p);
        }

        debug!("Removed {} resources under {}", removed, path);
        Ok(removed)
    }

    /// Number of stored nodes
    pub async fn len(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn session(&self) -> Result<Arc<dyn StoreSession>> {
        let snapshot = self.state.read().await.clone();
        Ok(Arc::new(MemorySession { snapshot }))
    }
}

/// Immutable snapshot of an [`InMemoryResourceStore`]
pub struct MemorySession {
    snapshot: Arc<StoreState>,
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn find(&self, path: &str) -> Result<Option<ResourceNode>> {
        Ok(self.snapshot.nodes.get(path).cloned())
    }

    async fn children(&self, path: &str) -> Result<Vec<ResourceNode>> {
        let Some(paths) = self.snapshot.children.get(path) else {
            return Ok(Vec::new());
        };

        Ok(paths
            .iter()
            .filter_map(|p| self.snapshot.nodes.get(p).cloned())
            .collect())
    }
}
