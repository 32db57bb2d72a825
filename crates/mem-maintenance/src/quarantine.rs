use dashmap::DashSet;
use uuid::Uuid;

/// Ids a consolidation cycle flagged with `PromotionInconsistent` — the
/// compensating rollback itself failed, so the record's presence across
/// tiers is unknown. The quality sweep periodically re-checks each one.
#[derive(Default)]
pub struct QuarantineRegistry {
    ids: DashSet<Uuid>,
}

impl QuarantineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_all(&self, ids: impl IntoIterator<Item = Uuid>) {
        for id in ids {
            self.ids.insert(id);
        }
    }

    pub fn clear(&self, id: Uuid) {
        self.ids.remove(&id);
    }

    pub fn snapshot(&self) -> Vec<Uuid> {
        self.ids.iter().map(|e| *e).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_ids_are_cleared_once_reconciled() {
        let registry = QuarantineRegistry::new();
        let id = Uuid::new_v4();
        registry.mark_all([id]);
        assert_eq!(registry.len(), 1);
        registry.clear(id);
        assert!(registry.is_empty());
    }
}
