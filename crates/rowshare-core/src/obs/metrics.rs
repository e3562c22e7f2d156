use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for shared-table resolution.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) tables: BTreeMap<String, TableCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Resolution
    pub resolve_calls: u64,
    pub longest_chain: u64,

    // Aggregate cache
    pub cache_hits: u64,
    pub cache_misses: u64,

    // Row membership
    pub rows_enumerated: u64,
    pub entries_enumerated: u64,

    // Configuration defects
    pub violations: u64,
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableCounters {
    pub resolve_calls: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub rows_enumerated: u64,
    pub entries_enumerated: u64,
    pub violations: u64,
}

///
/// EventReport
/// Point-in-time snapshot of all counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub tables: BTreeMap<String, TableCounters>,
}

impl EventReport {
    /// Counters for one table, if it recorded anything.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableCounters> {
        self.tables.get(name)
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current counters.
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        tables: m.tables.clone(),
    })
}
