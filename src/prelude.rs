pub use crate::args;
pub use crate::admission::{Admission, Verdict};
pub use crate::builder::MemoBuilder;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::key::Args;
pub use crate::memo::Memo;
pub use crate::memoize;
pub use crate::stats::{Instrumentation, MemoStats};
pub use crate::traits::{ConcurrentCache, MemoConfig, MemoizedFn};

#[cfg(feature = "metrics")]
pub use crate::metrics::exporter::PrometheusTextExporter;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::MemoMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
