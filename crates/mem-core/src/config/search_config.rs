use serde::{Deserialize, Serialize};

use crate::model::Tier;

/// Composite score weights for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub alpha_vector: f64,
    pub beta_lexical: f64,
    pub gamma_importance: f64,
    pub delta_strength: f64,
    pub epsilon_recency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            alpha_vector: 0.45,
            beta_lexical: 0.2,
            gamma_importance: 0.15,
            delta_strength: 0.1,
            epsilon_recency: 0.1,
        }
    }
}

impl ScoreWeights {
    /// STM favours recency over vector similarity.
    pub fn stm_default() -> Self {
        Self {
            alpha_vector: 0.15,
            beta_lexical: 0.25,
            gamma_importance: 0.15,
            delta_strength: 0.15,
            epsilon_recency: 0.3,
        }
    }

    /// LTM favours vector similarity.
    pub fn ltm_default() -> Self {
        Self {
            alpha_vector: 0.55,
            beta_lexical: 0.15,
            gamma_importance: 0.15,
            delta_strength: 0.1,
            epsilon_recency: 0.05,
        }
    }

    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Stm => Self::stm_default(),
            Tier::Mtm => Self::default(),
            Tier::Ltm => Self::ltm_default(),
        }
    }
}

/// Cross-tier search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub overfetch: usize,
    pub min_relevance: f64,
    /// Fraction of a unit reinforcement applied to items returned by a
    /// search.
    pub reinforcement_on_read: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            overfetch: 3,
            min_relevance: 0.0,
            reinforcement_on_read: 0.25,
        }
    }
}
