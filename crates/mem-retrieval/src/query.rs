use mem_core::model::Tier;

/// Caller-supplied retrieval request. `text` drives lexical scoring,
/// `embedding` drives vector k-NN on tiers that support it; either or
/// both may be set.
#[derive(Debug, Clone, Default)]
pub struct RetrievalQuery {
    pub text: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub tags: Vec<String>,
    /// `None` means "search all three tiers".
    pub tiers: Option<Vec<Tier>>,
    pub limit: usize,
}

impl RetrievalQuery {
    pub fn includes(&self, tier: Tier) -> bool {
        self.tiers.as_ref().map_or(true, |ts| ts.contains(&tier))
    }
}
