//! Metrics sink boundary.
//!
//! Resolution logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between resolution logic
//! and the thread-local metrics state.
use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent<'a> {
    Resolve { table: &'a str, chain_len: u64 },
    CacheHit { table: &'a str },
    CacheMiss { table: &'a str },
    RowEnumerated { table: &'a str, entries: u64 },
    Violation { table: &'a str },
}

impl<'a> MetricsEvent<'a> {
    #[must_use]
    pub const fn table(&self) -> &'a str {
        match *self {
            Self::Resolve { table, .. }
            | Self::CacheHit { table }
            | Self::CacheMiss { table }
            | Self::RowEnumerated { table, .. }
            | Self::Violation { table } => table,
        }
    }
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into the global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        metrics::with_state_mut(|m| {
            let entry = m.tables.entry(event.table().to_string()).or_default();

            match event {
                MetricsEvent::Resolve { chain_len, .. } => {
                    m.ops.resolve_calls = m.ops.resolve_calls.saturating_add(1);
                    m.ops.longest_chain = m.ops.longest_chain.max(chain_len);
                    entry.resolve_calls = entry.resolve_calls.saturating_add(1);
                }
                MetricsEvent::CacheHit { .. } => {
                    m.ops.cache_hits = m.ops.cache_hits.saturating_add(1);
                    entry.cache_hits = entry.cache_hits.saturating_add(1);
                }
                MetricsEvent::CacheMiss { .. } => {
                    m.ops.cache_misses = m.ops.cache_misses.saturating_add(1);
                    entry.cache_misses = entry.cache_misses.saturating_add(1);
                }
                MetricsEvent::RowEnumerated { entries, .. } => {
                    m.ops.rows_enumerated = m.ops.rows_enumerated.saturating_add(1);
                    m.ops.entries_enumerated = m.ops.entries_enumerated.saturating_add(entries);
                    entry.rows_enumerated = entry.rows_enumerated.saturating_add(1);
                    entry.entries_enumerated = entry.entries_enumerated.saturating_add(entries);
                }
                MetricsEvent::Violation { .. } => {
                    m.ops.violations = m.ops.violations.saturating_add(1);
                    entry.violations = entry.violations.saturating_add(1);
                }
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    // Clone out of the slot so a sink may record without holding the borrow.
    let scoped = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match scoped {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's counters.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset the current thread's counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// Events recorded on this thread while `f` runs go to `sink` instead of the
/// global counters. The previous override is restored on every exit.
#[cfg(test)]
pub(crate) fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Restore(Option<Rc<dyn MetricsSink>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| *cell.borrow_mut() = prev);
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _restore = Restore(prev);

    f()
}
