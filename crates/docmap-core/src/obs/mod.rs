//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Log lines go through `tracing`; counters go through the sink boundary.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{
    MetricsEvent, MetricsSink, WriteKind, metrics_report, metrics_reset_all, with_metrics_sink,
};
