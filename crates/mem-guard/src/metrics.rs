use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use mem_core::model::MetricSample;
use mem_core::traits::MetricsSink;

/// Bucket upper bounds shared by every histogram this publisher tracks.
/// Reasonable across both of the taxonomy's histogram shapes (operation
/// latency in milliseconds, and search result counts) without needing a
/// per-metric boundary configuration.
const HISTOGRAM_BUCKETS: &[f64] = &[1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

/// Classifies a metric name per the published taxonomy: event counters,
/// tier/queue gauges, and latency/result-count histograms. Anything not
/// recognized falls back to `Gauge` (overwrite-latest) rather than being
/// dropped, so a caller adding an ad-hoc metric still sees it recorded.
fn classify(name: &str) -> MetricKind {
    match name {
        "created" | "read" | "updated" | "deleted" | "promoted" | "forgotten" | "admitted"
        | "rejected" | "decayed" | "search_requests" | "search_results_total"
        | "audit_dropped_no_subscribers" => MetricKind::Counter,
        "operation_latency_ms" | "search_result_count" => MetricKind::Histogram,
        _ => MetricKind::Gauge,
    }
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct Key {
    name: &'static str,
    labels: Vec<(&'static str, String)>,
}

#[derive(Default)]
struct Histogram {
    buckets: Vec<AtomicU64>,
    count: AtomicU64,
    sum_bits: AtomicU64,
}

impl Histogram {
    fn new() -> Self {
        Self {
            buckets: (0..HISTOGRAM_BUCKETS.len() + 1).map(|_| AtomicU64::new(0)).collect(),
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0),
        }
    }

    fn observe(&self, value: f64) {
        let bucket = HISTOGRAM_BUCKETS.iter().position(|&b| value <= b).unwrap_or(HISTOGRAM_BUCKETS.len());
        self.buckets[bucket].fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + value).to_bits())
            })
            .ok();
    }

    fn mean(&self) -> f64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            f64::from_bits(self.sum_bits.load(Ordering::Relaxed)) / count as f64
        }
    }
}

/// Sharded-map-backed counters, gauges, and histograms, matching the
/// taxonomy every call site publishes against (see
/// [`mem_core::traits::MetricsSink`]'s doc comment). Each entry's update
/// is a single atomic operation guarded only by the map's per-shard
/// lock, in the same sense the rest of this workspace's `DashMap`-backed
/// state calls itself lock-free: no global mutex serializes unrelated
/// metric names.
#[derive(Default)]
pub struct MetricsPublisher {
    counters: DashMap<Key, AtomicU64>,
    gauges: DashMap<Key, AtomicU64>,
    histograms: DashMap<Key, Histogram>,
}

impl MetricsPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter_value(&self, name: &'static str, labels: &[(&'static str, String)]) -> u64 {
        let key = Key { name, labels: labels.to_vec() };
        self.counters.get(&key).map(|c| c.load(Ordering::Relaxed)).unwrap_or(0)
    }

    pub fn gauge_value(&self, name: &'static str, labels: &[(&'static str, String)]) -> f64 {
        let key = Key { name, labels: labels.to_vec() };
        self.gauges.get(&key).map(|g| f64::from_bits(g.load(Ordering::Relaxed))).unwrap_or(0.0)
    }

    pub fn histogram_mean(&self, name: &'static str, labels: &[(&'static str, String)]) -> f64 {
        let key = Key { name, labels: labels.to_vec() };
        self.histograms.get(&key).map(|h| h.mean()).unwrap_or(0.0)
    }

    pub fn histogram_count(&self, name: &'static str, labels: &[(&'static str, String)]) -> u64 {
        let key = Key { name, labels: labels.to_vec() };
        self.histograms.get(&key).map(|h| h.count.load(Ordering::Relaxed)).unwrap_or(0)
    }
}

impl MetricsSink for MetricsPublisher {
    fn record(&self, sample: MetricSample) {
        let key = Key { name: sample.name, labels: sample.labels };
        match classify(sample.name) {
            MetricKind::Counter => {
                self.counters
                    .entry(key)
                    .or_insert_with(|| AtomicU64::new(0))
                    .fetch_add(sample.value as u64, Ordering::Relaxed);
            }
            MetricKind::Gauge => {
                self.gauges
                    .entry(key)
                    .or_insert_with(|| AtomicU64::new(0))
                    .store(sample.value.to_bits(), Ordering::Relaxed);
            }
            MetricKind::Histogram => {
                self.histograms.entry(key).or_insert_with(Histogram::new).observe(sample.value);
            }
        }
    }
}
