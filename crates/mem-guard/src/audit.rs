use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use mem_core::model::{AuditEvent, AuditRecord, MetricSample};
use mem_core::traits::{AuditSink, MetricsSink};

/// Sequence-numbered event log. `emit` is synchronous and non-blocking,
/// so the "blocks the producer up to a short bound" behavior of a true
/// bounded MPMC queue is approximated with `tokio::sync::broadcast`'s
/// bounded ring buffer: once capacity is exceeded, the oldest
/// unconsumed record is dropped for any consumer that has fallen behind
/// (which observes it as `RecvError::Lagged` on its next `recv`) rather
/// than stalling the caller emitting the event. Multiple independent
/// consumers are supported natively via `subscribe`.
pub struct AuditTrail {
    tx: broadcast::Sender<AuditRecord>,
    sequence: AtomicU64,
    metrics: Arc<dyn MetricsSink>,
}

impl AuditTrail {
    pub fn new(capacity: usize, metrics: Arc<dyn MetricsSink>) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx, sequence: AtomicU64::new(0), metrics }
    }

    /// A fresh consumer handle, starting from the next record emitted
    /// after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AuditRecord> {
        self.tx.subscribe()
    }
}

impl AuditSink for AuditTrail {
    fn emit(&self, event: AuditEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let record = AuditRecord { sequence, recorded_at: Utc::now(), event };
        if self.tx.send(record).is_err() {
            self.metrics.record(MetricSample::counter("audit_dropped_no_subscribers", vec![]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mem_core::model::Tier;
    use mem_core::traits::NullSink;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscribers_receive_emitted_events_in_sequence_order() {
        let trail = AuditTrail::new(8, Arc::new(NullSink));
        let mut rx = trail.subscribe();

        trail.emit(AuditEvent::Expired { id: Uuid::new_v4() });
        trail.emit(AuditEvent::Forgotten { id: Uuid::new_v4(), tier: Tier::Mtm });

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
    }

    #[tokio::test]
    async fn a_lagging_subscriber_observes_lagged_rather_than_blocking_the_producer() {
        let trail = AuditTrail::new(1, Arc::new(NullSink));
        let mut rx = trail.subscribe();

        for _ in 0..3 {
            trail.emit(AuditEvent::Expired { id: Uuid::new_v4() });
        }

        assert!(matches!(rx.recv().await, Err(broadcast::error::RecvError::Lagged(_))));
    }

    #[test]
    fn emitting_with_no_subscribers_increments_the_drop_metric() {
        struct CountingSink(std::sync::atomic::AtomicUsize);
        impl MetricsSink for CountingSink {
            fn record(&self, _sample: MetricSample) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }
        let metrics = Arc::new(CountingSink(std::sync::atomic::AtomicUsize::new(0)));
        let trail = AuditTrail::new(4, metrics.clone());
        trail.emit(AuditEvent::Expired { id: Uuid::new_v4() });
        assert_eq!(metrics.0.load(Ordering::Relaxed), 1);
    }
}
