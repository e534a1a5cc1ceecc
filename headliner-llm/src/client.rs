//! The `LlmClient` seam and its caching decorator

use std::sync::Arc;

use async_trait::async_trait;
use headliner_core::{HeadlinerError, LlmRequest};
use tracing::{debug, info};

use crate::ResponseCache;

/// Sends a chat-completion request and returns the generated text
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<String, HeadlinerError>;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn complete(&self, request: &LlmRequest) -> Result<String, HeadlinerError> {
        (**self).complete(request).await
    }
}

/// Wraps a client so byte-identical requests are answered from the cache
pub struct CachedLlmClient<C> {
    inner: C,
    cache: Arc<dyn ResponseCache>,
}

impl<C: LlmClient> CachedLlmClient<C> {
    pub fn new(inner: C, cache: Arc<dyn ResponseCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }
}

#[async_trait]
impl<C: LlmClient> LlmClient for CachedLlmClient<C> {
    async fn complete(&self, request: &LlmRequest) -> Result<String, HeadlinerError> {
        let key = request.cache_key()?;

        if let Some(cached) = self.cache.get(&key) {
            info!(
                "LLM cache hit - model={}, response_length={} chars",
                request.model,
                cached.len()
            );
            return Ok(cached);
        }

        debug!("LLM cache miss - model={}", request.model);
        let response = self.inner.complete(request).await?;
        self.cache.set(key, response.clone());
        Ok(response)
    }
}
