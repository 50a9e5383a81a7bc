//! Pipeline instruments

use std::time::Instant;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

pub const TRANSCRIPTION_DURATION: &str = "scrivener.transcription.duration";
pub const MERGE_DURATION: &str = "scrivener.merge.duration";
pub const MERGE_OUTCOME: &str = "scrivener.merge.outcome";

/// Instruments recorded by the dictation pipeline
///
/// Bound to the global meter provider; without an exporter every
/// recording is a no-op.
#[derive(Clone)]
pub struct PipelineMetrics {
    transcription_duration: Histogram<f64>,
    merge_duration: Histogram<f64>,
    merge_outcome: Counter<u64>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        let meter = global::meter("scrivener");

        Self {
            transcription_duration: meter
                .f64_histogram(TRANSCRIPTION_DURATION)
                .with_unit("s")
                .with_description("Time spent waiting on the transcription upstream")
                .build(),
            merge_duration: meter
                .f64_histogram(MERGE_DURATION)
                .with_unit("s")
                .with_description("Time spent merging a transcript into a template")
                .build(),
            merge_outcome: meter
                .u64_counter(MERGE_OUTCOME)
                .with_description("Template merges by outcome")
                .build(),
        }
    }

    pub fn record_transcription(&self, start: Instant, outcome: &'static str) {
        record_duration(&self.transcription_duration, start, &[KeyValue::new("outcome", outcome)]);
    }

    /// `outcome` is `success` or the failure kind
    pub fn record_merge(&self, start: Instant, outcome: &'static str) {
        let attributes = [KeyValue::new("outcome", outcome)];
        record_duration(&self.merge_duration, start, &attributes);
        self.merge_outcome.add(1, &attributes);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PipelineMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineMetrics").finish_non_exhaustive()
    }
}

/// Record the time elapsed since `start` on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
