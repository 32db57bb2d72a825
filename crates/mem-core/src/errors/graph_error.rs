/// Errors raised by the knowledge-graph backend.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("memory {id} is not present in LTM; relationships require both endpoints in LTM")]
    EndpointNotInLtm { id: String },

    #[error("graph lock poisoned: {0}")]
    Poisoned(String),
}
