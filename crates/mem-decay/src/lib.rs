//! Deterministic strength/reinforcement decay equations and the batch
//! engine that applies them. Operates on records already fetched by the
//! caller; never touches a backend directly.

mod engine;
mod equations;

pub use engine::{DecayBatchReport, DecayContext, DecayEngine};
pub use equations::{decay_item, forgetting_threshold, reinforce};
