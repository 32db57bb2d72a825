use mem_core::errors::EngineResult;
use mem_core::model::Tier;

/// The pipeline's boundary onto the capacity watchdog (`mem-guard`'s
/// implementation is injected at construction). Kept as a small trait
/// here rather than a dependency on `mem-guard` itself, since the
/// watchdog sits above this crate in the composition (`mem-manager`
/// wires both together).
pub trait TierAdmission: Send + Sync {
    fn admit(&self, tier: Tier) -> EngineResult<()>;
}

/// Always admits. Useful for tests and standalone pipeline use where no
/// watchdog is wired in.
pub struct AlwaysAdmit;

impl TierAdmission for AlwaysAdmit {
    fn admit(&self, _tier: Tier) -> EngineResult<()> {
        Ok(())
    }
}
