use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::MemoMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for memo metrics snapshots.
///
/// This exporter writes in the Prometheus text exposition format so it can be
/// scraped by Prometheus or forwarded to an OpenTelemetry collector. Counters
/// of an uninstrumented memo are not written; only the `cache_len` gauge is.
///
/// # Example
///
/// ```
/// use memokit::memo::Memo;
/// use memokit::metrics::exporter::PrometheusTextExporter;
/// use memokit::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
///
/// let memo = Memo::new(|n: &u64| n * 2, |_: &u64| true, true);
/// memo.invoke(21);
///
/// let exporter = PrometheusTextExporter::new("double", Vec::new());
/// exporter.export(&memo.snapshot());
///
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("double_misses_total 1"));
/// assert!(text.contains("double_cache_len 1"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    /// Creates an exporter writing metric names as `<prefix>_<name>`; an
    /// empty prefix writes bare names.
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_counter(&self, writer: &mut W, name: &str, value: u64) {
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, writer: &mut W, name: &str, value: u64) {
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<MemoMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &MemoMetricsSnapshot) {
        // One lock for the whole snapshot keeps concurrent exports from interleaving.
        let mut writer = self.writer.lock();
        let writer = &mut *writer;

        if snapshot.instrumented {
            let counters = [
                ("hits_total", snapshot.hits),
                ("misses_total", snapshot.misses),
                ("calls_total", snapshot.total()),
                ("admitted_total", snapshot.admitted),
                ("rejected_total", snapshot.rejected),
                ("overwrites_total", snapshot.overwrites),
                ("invalidations_total", snapshot.invalidations),
                ("failures_total", snapshot.failures),
            ];
            for (suffix, value) in counters {
                self.write_counter(writer, &self.metric_name(suffix), value);
            }
        }
        self.write_gauge(
            writer,
            &self.metric_name("cache_len"),
            snapshot.cache_len as u64,
        );
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(prefix: &str, snapshot: &MemoMetricsSnapshot) -> String {
        let exporter = PrometheusTextExporter::new(prefix, Vec::new());
        exporter.export(snapshot);
        String::from_utf8(exporter.into_inner()).unwrap()
    }

    #[test]
    fn writes_counters_and_gauge() {
        let snapshot = MemoMetricsSnapshot {
            instrumented: true,
            hits: 5,
            misses: 2,
            admitted: 1,
            rejected: 1,
            cache_len: 1,
            ..Default::default()
        };
        let text = render("memo", &snapshot);

        assert!(text.contains("# TYPE memo_hits_total counter\nmemo_hits_total 5\n"));
        assert!(text.contains("memo_misses_total 2\n"));
        assert!(text.contains("memo_calls_total 7\n"));
        assert!(text.contains("memo_rejected_total 1\n"));
        assert!(text.contains("memo_failures_total 0\n"));
        assert!(text.contains("# TYPE memo_cache_len gauge\nmemo_cache_len 1\n"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let snapshot = MemoMetricsSnapshot {
            instrumented: true,
            ..Default::default()
        };
        let text = render("", &snapshot);
        assert!(text.contains("\nhits_total 0\n"));
        assert!(!text.contains("_hits_total"));
    }

    #[test]
    fn uninstrumented_snapshot_only_writes_gauge() {
        let snapshot = MemoMetricsSnapshot {
            instrumented: false,
            cache_len: 3,
            ..Default::default()
        };
        let text = render("memo", &snapshot);
        assert!(!text.contains("counter"));
        assert_eq!(text, "# TYPE memo_cache_len gauge\nmemo_cache_len 3\n");
    }
}
