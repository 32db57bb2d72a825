use chrono::{DateTime, Utc};

use mem_core::config::DecayParams;
use mem_core::model::MemoryItem;

/// `threshold_fg(importance)`: lower for important items, higher for
/// unimportant ones, so forgetting favors clearing out low-value memory
/// first.
pub fn forgetting_threshold(importance: f64, params: &DecayParams) -> f64 {
    params.forgetting_threshold_base + (0.5 - importance) * params.forgetting_threshold_w_fg
}

fn strength_baseline(importance: f64, params: &DecayParams) -> f64 {
    (params.baseline_b0 + importance * params.importance_weight_w_i)
        .clamp(params.min_strength, params.max_strength)
}

fn saturation_target(reinforcement: f64, baseline: f64, params: &DecayParams) -> f64 {
    let r = reinforcement.max(0.0);
    baseline + (params.max_strength - baseline) * (1.0 - (-r / params.r_scale).exp())
}

fn step_toward(current: f64, target: f64, max_step: f64) -> f64 {
    let diff = target - current;
    current + diff.signum() * diff.abs().min(max_step)
}

/// Applies one decay pass in place and reports whether the item's new
/// strength has fallen below its importance-weighted forgetting
/// threshold. `Δt = 0` (a pass re-run at the same instant as the last
/// one) is a no-op: no state is touched and the item is never reported
/// forgotten on that basis alone.
pub fn decay_item(item: &mut MemoryItem, params: &DecayParams, now: DateTime<Utc>, manual: bool) -> bool {
    let elapsed_secs = (now - item.last_decayed_at).num_milliseconds().max(0) as f64 / 1000.0;
    if elapsed_secs == 0.0 {
        return false;
    }

    let reinforcement = item.reinforcement_level * (-elapsed_secs / params.reinforcement_half_life_secs).exp();
    let baseline = strength_baseline(item.importance, params);
    let target = saturation_target(reinforcement, baseline, params);
    let max_step = if manual {
        params.max_decay_per_cycle * params.manual_multiplier
    } else {
        params.max_decay_per_cycle
    };

    item.strength = step_toward(item.strength, target, max_step).clamp(params.min_strength, params.max_strength);
    item.reinforcement_level = reinforcement.clamp(0.0, params.max_reinforcement_level);
    item.last_decayed_at = now;

    item.strength < forgetting_threshold(item.importance, params)
}

/// Reinforces an item on access (`strengthen = 1.0`) or an explicit
/// boost (caller-chosen multiplier). Reinforcement raises
/// `reinforcement_level` directly; the resulting strength gain is
/// capped per pass at `max_reinforcement_step` independent of the decay
/// engine's own per-cycle cap.
pub fn reinforce(item: &mut MemoryItem, params: &DecayParams, strengthen: f64, now: DateTime<Utc>) {
    let importance_factor = (1.0 + (item.importance - 0.5) * params.reinforcement_importance_weight).max(0.2);
    let reinforcement = (item.reinforcement_level + strengthen * params.reinforcement_unit * importance_factor)
        .min(params.max_reinforcement_level);

    let baseline = strength_baseline(item.importance, params);
    let target = saturation_target(reinforcement, baseline, params);

    item.strength = step_toward(item.strength, target, params.max_reinforcement_step)
        .clamp(params.min_strength, params.max_strength);
    item.reinforcement_level = reinforcement;
    item.last_reinforced_at = now;
    item.reinforcement_count += 1;
}
