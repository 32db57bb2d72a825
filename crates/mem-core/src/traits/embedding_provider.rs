use async_trait::async_trait;

use crate::errors::EngineResult;

/// Boundary interface to an injected embedding implementation (local
/// model, remote API). Pure with respect to input text; failures are
/// retriable. Determinism per input is only required for test seams —
/// this trait is not itself an LLM adapter.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> EngineResult<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> EngineResult<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize;
    fn name(&self) -> &str;
}
