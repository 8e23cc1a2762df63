//! Data and process node traits.

use std::sync::Arc;

use async_trait::async_trait;
use bionode_common::{BionodeError, Result, SandboxClient, SourcesConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::meta::NodeMeta;
use crate::notify::Notifier;
use crate::view::View;

/// A typed value that flows along graph edges.
///
/// The serde shape *is* the schema: required fields are plain, optional
/// fields are `#[serde(default)] Option<_>`, and nullable fields use
/// [`crate::schema::nullable`] so the key must be present.
pub trait DataNode: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const META: NodeMeta;

    /// Validates an untyped payload against this node's schema.
    fn decode(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|source| BionodeError::SchemaMismatch {
            node: Self::META.id,
            source,
        })
    }

    fn encode(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn view(&self) -> View;
}

/// Narrative emitted for a resolved node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<String>,
}

impl Story {
    pub fn new(abstract_text: impl Into<String>) -> Self {
        Self { abstract_text: abstract_text.into(), ..Self::default() }
    }

    pub fn with_introduction(mut self, text: impl Into<String>) -> Self {
        self.introduction = Some(text.into());
        self
    }

    pub fn with_methods(mut self, text: impl Into<String>) -> Self {
        self.methods = Some(text.into());
        self
    }
}

/// Everything a resolver may touch. Holds no per-call state.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    pub client: SandboxClient,
    pub config: Arc<SourcesConfig>,
    pub notifier: Notifier,
}

impl ResolveContext {
    pub fn new(config: SourcesConfig) -> Result<Self> {
        let client = SandboxClient::from_config(&config)?;
        Ok(Self {
            client,
            config: Arc::new(config),
            notifier: Notifier::disabled(),
        })
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }
}

/// A node that turns typed inputs into a data node, usually through one or
/// more remote calls.
#[async_trait]
pub trait ProcessNode: Send + Sync {
    const META: NodeMeta;
    /// Argument name -> input data node id
    const INPUTS: &'static [(&'static str, &'static str)];

    type Input: Send + Sync;
    type Output: DataNode;

    async fn resolve(&self, input: Self::Input, ctx: &ResolveContext) -> Result<Self::Output>;

    /// `None` when the story is requested before inputs are bound.
    fn story(&self, input: Option<&Self::Input>) -> Story;
}
