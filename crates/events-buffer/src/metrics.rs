use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, Registry};

/// Latency buckets for buffer operations.
///
/// Prometheus histograms have default buckets which, broadly speaking,
/// are tailored to measure the response time of a network service: the
/// smallest default bucket is 5ms. Buffer operations are in-memory and
/// complete in microseconds.
const OP_SECONDS_BUCKETS: &[f64] = &[
    1e-6, 5e-6, 10e-6, 50e-6, 100e-6, 500e-6, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Size buckets for slice results, capped by
/// [`crate::BufferOptions::max_buffered_chunk_size`].
const SLICE_SIZE_BUCKETS: &[f64] = &[0.0, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0, 512.0, 1024.0];

/// Prometheus collectors for all [`crate::EventsBuffer`] instances in
/// the process.
///
/// Each signal carries a `buffer` label naming the instance; per-buffer
/// handles are resolved once at construction via
/// [`EventsBufferMetrics::for_buffer`].
pub struct EventsBufferMetrics {
    pub push_seconds: HistogramVec,
    pub slice_seconds: HistogramVec,
    pub prune_seconds: HistogramVec,
    pub slice_size: HistogramVec,
}

impl EventsBufferMetrics {
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        fn histogram_vec(registry: &Registry, name: &str, help: &str, buckets: &[f64]) -> prometheus::Result<HistogramVec> {
            let vec = HistogramVec::new(HistogramOpts::new(name, help).buckets(buckets.to_vec()), &["buffer"])?;
            registry.register(Box::new(vec.clone()))?;
            Ok(vec)
        }

        Ok(Self {
            push_seconds: histogram_vec(
                registry,
                "chronicle_events_buffer_push_seconds",
                "Time to append one committed event to the in-memory buffer",
                OP_SECONDS_BUCKETS,
            )?,
            slice_seconds: histogram_vec(
                registry,
                "chronicle_events_buffer_slice_seconds",
                "Time to answer a range query from the in-memory buffer",
                OP_SECONDS_BUCKETS,
            )?,
            prune_seconds: histogram_vec(
                registry,
                "chronicle_events_buffer_prune_seconds",
                "Time to drop events at or below a pruning offset",
                OP_SECONDS_BUCKETS,
            )?,
            slice_size: histogram_vec(
                registry,
                "chronicle_events_buffer_slice_size",
                "Number of events returned by a range query",
                SLICE_SIZE_BUCKETS,
            )?,
        })
    }

    /// Resolve the label handles for the buffer named `qualifier`.
    pub fn for_buffer(&self, qualifier: &str) -> QualifiedMetrics {
        QualifiedMetrics {
            push_seconds: self.push_seconds.with_label_values(&[qualifier]),
            slice_seconds: self.slice_seconds.with_label_values(&[qualifier]),
            prune_seconds: self.prune_seconds.with_label_values(&[qualifier]),
            slice_size: self.slice_size.with_label_values(&[qualifier]),
        }
    }
}

/// [`EventsBufferMetrics`] registered on the process-wide default
/// registry.
pub static EVENTS_BUFFER_METRICS: Lazy<EventsBufferMetrics> = Lazy::new(|| {
    EventsBufferMetrics::new(prometheus::default_registry()).expect("register events-buffer collectors on the default registry")
});

/// Signal handles of a single buffer, with the `buffer` label applied.
#[derive(Clone)]
pub struct QualifiedMetrics {
    pub(crate) push_seconds: Histogram,
    pub(crate) slice_seconds: Histogram,
    pub(crate) prune_seconds: Histogram,
    pub(crate) slice_size: Histogram,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_buffer_resolves_distinct_children() {
        let metrics = EventsBufferMetrics::new(&Registry::new()).unwrap();
        let a = metrics.for_buffer("transactions");
        let b = metrics.for_buffer("completions");

        a.slice_size.observe(3.0);
        assert_eq!(a.slice_size.get_sample_count(), 1);
        assert_eq!(b.slice_size.get_sample_count(), 0);
    }

    #[test]
    fn timer_records_into_the_vec() {
        let metrics = EventsBufferMetrics::new(&Registry::new()).unwrap();
        let handles = metrics.for_buffer("transactions");

        drop(handles.push_seconds.start_timer());
        assert_eq!(metrics.push_seconds.with_label_values(&["transactions"]).get_sample_count(), 1);
    }
}
