use dashmap::DashSet;
use uuid::Uuid;

use mem_core::model::Tier;

/// In-flight guard set preventing two concurrent promotions of the same
/// `(id, source_tier)`. Shared across a maintenance cycle (and, for a
/// single-process deployment, across concurrent cycles).
#[derive(Default)]
pub struct ClaimRegistry {
    held: DashSet<(Uuid, Tier)>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim `(id, from)`. Returns `None` if already held by
    /// another in-flight promotion; otherwise returns a guard that
    /// releases the claim on drop.
    pub fn try_claim(&self, id: Uuid, from: Tier) -> Option<ClaimGuard<'_>> {
        if self.held.insert((id, from)) {
            Some(ClaimGuard {
                registry: self,
                key: (id, from),
            })
        } else {
            None
        }
    }
}

pub struct ClaimGuard<'a> {
    registry: &'a ClaimRegistry,
    key: (Uuid, Tier),
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        self.registry.held.remove(&self.key);
    }
}
