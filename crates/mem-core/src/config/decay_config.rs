use serde::{Deserialize, Serialize};

/// Parameters for the strength/reinforcement decay equations. Field
/// names track the underlying symbols (`b0`, `w_i`, `R_scale`, ...) so
/// the decay engine reads as a direct transcription of the math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayParams {
    /// `H_r`: reinforcement half-life, in seconds.
    pub reinforcement_half_life_secs: f64,
    /// Passive strength half-life, in seconds (drives `R_scale` below).
    pub passive_half_life_secs: f64,
    /// `b0`: strength baseline before the importance term.
    pub baseline_b0: f64,
    /// `w_i`: importance weight added to the baseline.
    pub importance_weight_w_i: f64,
    /// `R_scale`: reinforcement-to-strength saturation scale.
    pub r_scale: f64,
    /// Maximum `|s' - s|` applied per decay cycle.
    pub max_decay_per_cycle: f64,
    /// `threshold_fg` base forgetting threshold.
    pub forgetting_threshold_base: f64,
    /// `w_fg`: importance weight on the forgetting threshold.
    pub forgetting_threshold_w_fg: f64,
    /// Multiplier applied to `max_decay_per_cycle` on the manual decay path.
    pub manual_multiplier: f64,
    /// `R_unit`: reinforcement granted per access/boost.
    pub reinforcement_unit: f64,
    /// `w_r`: importance weight on reinforcement magnitude.
    pub reinforcement_importance_weight: f64,
    /// Per-pass cap on the resulting strength gain from reinforcement.
    pub max_reinforcement_step: f64,
    /// `R_max`: ceiling on `reinforcement_level`.
    pub max_reinforcement_level: f64,
    pub min_strength: f64,
    pub max_strength: f64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            reinforcement_half_life_secs: 20.0 * 60.0,
            passive_half_life_secs: 40.0 * 60.0,
            baseline_b0: 0.1,
            importance_weight_w_i: 0.3,
            r_scale: 1.0,
            max_decay_per_cycle: 0.2,
            forgetting_threshold_base: 0.12,
            forgetting_threshold_w_fg: 0.1,
            manual_multiplier: 3.0,
            reinforcement_unit: 0.2,
            reinforcement_importance_weight: 0.4,
            max_reinforcement_step: 0.3,
            max_reinforcement_level: 5.0,
            min_strength: 0.0,
            max_strength: 1.0,
        }
    }
}

impl DecayParams {
    /// MTM defaults: 40 min passive half-life, 20 min reinforcement half-life.
    pub fn mtm_default() -> Self {
        Self::default()
    }

    /// LTM defaults: 12 h passive half-life, 4 h reinforcement half-life.
    pub fn ltm_default() -> Self {
        Self {
            passive_half_life_secs: 12.0 * 3600.0,
            reinforcement_half_life_secs: 4.0 * 3600.0,
            baseline_b0: 0.2,
            forgetting_threshold_base: 0.05,
            ..Self::default()
        }
    }
}
