use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Applies a bounded multiplicative jitter to `base`. No dependency on a
/// random-number crate is warranted for a cosmetic scheduling offset, so
/// this draws its entropy from the sub-millisecond component of the
/// wall clock at call time.
pub(crate) fn jittered(base: Duration, fraction: f64) -> Duration {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction == 0.0 {
        return base;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let unit = (nanos % 1_000_000) as f64 / 1_000_000.0; // [0, 1)
    let offset = (unit * 2.0 - 1.0) * fraction; // [-fraction, fraction)
    base.mul_f64((1.0 + offset).max(0.0))
}
