//! Observability: runtime counters and the sink abstraction feeding them.
//!
//! Structured logs go through `tracing`; counters go through `sink::record`.
//! Resolution code never touches `metrics` state directly.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EventOps, EventReport, TableCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all};
