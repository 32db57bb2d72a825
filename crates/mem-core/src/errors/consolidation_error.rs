/// Errors raised inside the consolidation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidationError {
    #[error("item {id} already claimed for promotion")]
    AlreadyClaimed { id: String },

    #[error("promotion of {id} from {from:?} to {to:?} failed and rollback also failed: {reason}")]
    RollbackFailed {
        id: String,
        from: crate::model::Tier,
        to: crate::model::Tier,
        reason: String,
    },

    #[error("retries exhausted promoting {id}: {reason}")]
    RetriesExhausted { id: String, reason: String },
}
