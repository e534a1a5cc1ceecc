//! Language model access for the Headliner service
//!
//! This crate provides the `LlmClient` abstraction, an OpenAI-compatible
//! client (OpenRouter by default), a FIFO response cache that makes repeated
//! identical requests free, and the prompt templates used by the pipeline.

pub mod cache;
pub mod client;
pub mod openai;
pub mod prompts;

pub use cache::{FileResponseCache, MemoryResponseCache, ResponseCache, DEFAULT_CACHE_CAPACITY};
pub use client::{CachedLlmClient, LlmClient};
pub use openai::{OpenRouterClient, DEFAULT_API_BASE, DEFAULT_MODEL};
