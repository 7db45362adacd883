//! Extended memo metrics (feature `metrics`).
//!
//! Core hit/miss counters live in [`crate::stats`] and are always available.
//! This module adds admission-level counters, a snapshot type, and a
//! Prometheus text exporter for production monitoring.

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
