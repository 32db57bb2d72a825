//! Cross-cutting services shared by the ingestion, retrieval, and
//! maintenance paths: a stateless content [`Sanitizer`], a
//! [`CapacityWatchdog`] implementing [`mem_consolidation::TierAdmission`],
//! a sequence-numbered [`AuditTrail`], and a [`MetricsPublisher`].

mod audit;
mod metrics;
mod sanitizer;
mod watchdog;

pub use audit::AuditTrail;
pub use metrics::MetricsPublisher;
pub use sanitizer::Sanitizer;
pub use watchdog::CapacityWatchdog;
