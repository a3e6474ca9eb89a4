//! Shared store fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use cretoai_webac::{
    vocab, InMemoryResourceStore, ResourceNode, ResourceStore, Result, StoreSession, Term,
    WebAcError,
};
use std::sync::{Arc, Once};
use tokio::sync::Notify;

pub const PREFIX: &str = vocab::DEFAULT_REPOSITORY_PREFIX;
pub const PUBLIC_TYPE: &str = "http://example.com/terms#publicImage";

static TRACING: Once = Once::new();

/// Install a test subscriber honoring RUST_LOG
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builder for one authorization child of an ACL
pub struct AuthSpec {
    name: &'static str,
    agents: Vec<&'static str>,
    agent_classes: Vec<&'static str>,
    modes: Vec<&'static str>,
    access_to: Vec<&'static str>,
    access_to_class: Vec<&'static str>,
}

impl AuthSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            agents: Vec::new(),
            agent_classes: Vec::new(),
            modes: Vec::new(),
            access_to: Vec::new(),
            access_to_class: Vec::new(),
        }
    }

    pub fn agent(mut self, agent: &'static str) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn agent_class(mut self, class: &'static str) -> Self {
        self.agent_classes.push(class);
        self
    }

    pub fn mode(mut self, mode: &'static str) -> Self {
        self.modes.push(mode);
        self
    }

    pub fn access_to(mut self, path: &'static str) -> Self {
        self.access_to.push(path);
        self
    }

    pub fn access_to_class(mut self, type_uri: &'static str) -> Self {
        self.access_to_class.push(type_uri);
        self
    }

    pub fn into_node(self, acl: &ResourceNode) -> ResourceNode {
        let mut node = ResourceNode::child_of(acl, format!("{}/{}", acl.path, self.name))
            .with_type(vocab::AUTHORIZATION);

        for agent in self.agents {
            node = node.with_property(PREFIX, vocab::AGENT, Term::literal(agent));
        }
        for class in self.agent_classes {
            node = node.with_property(PREFIX, vocab::AGENT_CLASS, Term::uri(class));
        }
        for mode in self.modes {
            node = node.with_property(PREFIX, vocab::MODE, Term::uri(mode));
        }
        for path in self.access_to {
            node = node.with_property(PREFIX, vocab::ACCESS_TO, Term::uri(format!("{}{}", PREFIX, path)));
        }
        for type_uri in self.access_to_class {
            node = node.with_property(PREFIX, vocab::ACCESS_TO_CLASS, Term::uri(type_uri));
        }
        node
    }
}

/// Store the ACL at `acl_path` with the given authorizations
pub async fn put_acl(store: &InMemoryResourceStore, acl_path: &str, auths: Vec<AuthSpec>) -> ResourceNode {
    let acl = ResourceNode::root(acl_path);
    store.put(acl.clone()).await.unwrap();
    for auth in auths {
        store.put(auth.into_node(&acl)).await.unwrap();
    }
    acl
}

/// `/acls/01`: smith123 may read and write `/webacl_box1`
pub fn acl01() -> Vec<AuthSpec> {
    vec![AuthSpec::new("authorization")
        .agent("smith123")
        .mode(vocab::MODE_READ)
        .mode(vocab::MODE_WRITE)
        .access_to("/webacl_box1")]
}

/// `/acls/02`: Editors may read and write `/box/bag/collection`
pub fn acl02() -> Vec<AuthSpec> {
    vec![AuthSpec::new("authorization")
        .agent_class("Editors")
        .mode(vocab::MODE_READ)
        .mode(vocab::MODE_WRITE)
        .access_to("/box/bag/collection")]
}

/// `/acls/03`: Restricted reads `/dark/archive`; everyone reads public images
pub fn acl03() -> Vec<AuthSpec> {
    vec![
        AuthSpec::new("auth_restricted")
            .agent_class("Restricted")
            .mode(vocab::MODE_READ)
            .access_to("/dark/archive"),
        AuthSpec::new("auth_open")
            .agent_class(vocab::FOAF_AGENT)
            .mode(vocab::MODE_READ)
            .access_to_class(PUBLIC_TYPE),
    ]
}

/// `/acls/04`: everyone reads, Editors read and write `/public_collection`
pub fn acl04() -> Vec<AuthSpec> {
    vec![
        AuthSpec::new("auth1")
            .agent_class(vocab::FOAF_AGENT)
            .mode(vocab::MODE_READ)
            .access_to("/public_collection"),
        AuthSpec::new("auth2")
            .agent_class("Editors")
            .mode(vocab::MODE_READ)
            .mode(vocab::MODE_WRITE)
            .access_to("/public_collection"),
    ]
}

/// `/acls/05`: Admins read `/mixedCollection`; everyone reads public images
pub fn acl05() -> Vec<AuthSpec> {
    vec![
        AuthSpec::new("auth_restricted")
            .agent_class("Admins")
            .mode(vocab::MODE_READ)
            .access_to("/mixedCollection"),
        AuthSpec::new("auth_open")
            .agent_class(vocab::FOAF_AGENT)
            .mode(vocab::MODE_READ)
            .access_to_class(PUBLIC_TYPE),
    ]
}

/// Session whose every read fails
pub struct FailingSession;

#[async_trait]
impl StoreSession for FailingSession {
    async fn find(&self, path: &str) -> Result<Option<ResourceNode>> {
        Err(WebAcError::Store(format!("read of {} timed out", path)))
    }

    async fn children(&self, path: &str) -> Result<Vec<ResourceNode>> {
        Err(WebAcError::Store(format!("listing {} timed out", path)))
    }
}

/// Session that can read nodes but fails listing children
pub struct BrokenChildrenSession {
    pub inner: Arc<dyn StoreSession>,
}

#[async_trait]
impl StoreSession for BrokenChildrenSession {
    async fn find(&self, path: &str) -> Result<Option<ResourceNode>> {
        self.inner.find(path).await
    }

    async fn children(&self, path: &str) -> Result<Vec<ResourceNode>> {
        Err(WebAcError::Store(format!("listing {} failed", path)))
    }
}

/// Store whose sessions pause in `children` until released
pub struct GatedStore {
    pub store: Arc<InMemoryResourceStore>,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedStore {
    pub fn new(store: Arc<InMemoryResourceStore>) -> Self {
        Self {
            store,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl ResourceStore for GatedStore {
    async fn session(&self) -> Result<Arc<dyn StoreSession>> {
        Ok(Arc::new(GatedSession {
            inner: self.store.session().await?,
            entered: self.entered.clone(),
            release: self.release.clone(),
        }))
    }
}

struct GatedSession {
    inner: Arc<dyn StoreSession>,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl StoreSession for GatedSession {
    async fn find(&self, path: &str) -> Result<Option<ResourceNode>> {
        self.inner.find(path).await
    }

    async fn children(&self, path: &str) -> Result<Vec<ResourceNode>> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.children(path).await
    }
}
