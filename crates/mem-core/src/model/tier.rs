use serde::{Deserialize, Serialize};

/// The three memory tiers. Ordering is significant: [`Tier::rank`] encodes
/// the one-directional promotion path STM -> MTM -> LTM; a memory's tier
/// never moves downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Stm,
    Mtm,
    Ltm,
}

impl Tier {
    fn rank(self) -> u8 {
        match self {
            Tier::Stm => 0,
            Tier::Mtm => 1,
            Tier::Ltm => 2,
        }
    }

    /// The tier this one promotes into, or `None` for LTM (terminal tier).
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Stm => Some(Tier::Mtm),
            Tier::Mtm => Some(Tier::Ltm),
            Tier::Ltm => None,
        }
    }

    /// Whether `self -> to` is a legal promotion (strictly forward).
    pub fn can_promote_to(self, to: Tier) -> bool {
        to.rank() > self.rank()
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Stm => write!(f, "stm"),
            Tier::Mtm => write!(f, "mtm"),
            Tier::Ltm => write!(f, "ltm"),
        }
    }
}
