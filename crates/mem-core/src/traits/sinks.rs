use crate::model::{AuditEvent, MetricSample};

/// Injected audit channel: single-producer-per-caller, multi-consumer,
/// bounded-capacity queue semantics; overflow blocks the producer up to
/// a short bound, then drops with a metric increment. Sequence-numbering
/// happens in the `mem-guard` implementation, not here — this trait only
/// describes the emission boundary.
pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

/// Injected metrics sink. Metrics are lock-free counters/histograms in
/// the reference implementation (`mem-guard::metrics`); this trait is
/// the seam callers inject at construction.
pub trait MetricsSink: Send + Sync {
    fn record(&self, sample: MetricSample);
}

/// No-op sinks, useful for tests and as a default when the caller does
/// not wire in a real sink.
pub struct NullSink;

impl AuditSink for NullSink {
    fn emit(&self, _event: AuditEvent) {}
}

impl MetricsSink for NullSink {
    fn record(&self, _sample: MetricSample) {}
}
