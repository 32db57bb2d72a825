//! Content-addressed caching for injected embedding providers. The
//! engine treats embedding generation as a boundary interface
//! (`mem_core::traits::EmbeddingProvider`, implemented by the host); this
//! crate only supplies the bounded LRU in front of it.

mod cache;
mod caching_provider;

pub use cache::ContentHash;
pub use caching_provider::CachingProvider;
