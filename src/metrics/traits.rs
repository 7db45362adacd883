//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting, and export are separated into small traits so
//! monitoring does not leak into the memo's invoke path.
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │    MemoMetricsRecorder      │   written under the memo's store lock
//!   │  admitted/rejected/failure  │
//!   │  overwrite/invalidation     │
//!   └──────────────┬──────────────┘
//!                  │
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (point-in-time copy)         │    │ (Prometheus text, ...)       │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Admission-level counters recorded on the memo's miss and reset paths.
pub trait MemoMetricsRecorder {
    /// A computed value passed the admission policy and was stored.
    fn record_admitted(&mut self);
    /// A computed value was returned but not stored.
    fn record_rejected(&mut self);
    /// An admitted insert replaced an entry stored by a racing miss.
    fn record_overwrite(&mut self);
    /// A single-key reset removed an entry.
    fn record_invalidation(&mut self);
    /// The computation or the admission policy failed.
    fn record_failure(&mut self);
    /// Counters were cleared by a full reset.
    fn record_clear(&mut self);
}

/// Produces a point-in-time copy of a memo's counters, read under its lock.
///
/// The snapshot is what a [`MetricsExporter`] publishes.
pub trait MetricsSnapshotProvider<S> {
    /// Captures the current counters and gauges.
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    /// Publishes one snapshot.
    fn export(&self, snapshot: &S);
}
