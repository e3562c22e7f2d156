//! Module: db
//! Responsibility: consolidate tracked entries that share one physical row.
//! Does not own: change tracking, SQL generation, or column values.
//! Boundary: the save pipeline submits entries; the update adapter navigates them.
//!
//! Invariants:
//! - Every entry of a shared row resolves to one main entry.
//! - One aggregate value exists per main entry per cache instance.
//! - Principal and dependent chains are acyclic and bounded in depth; a
//!   violation is reported, never followed.

mod cache;
mod compare;
mod enumerate;
mod registry;
mod resolve;

#[cfg(test)]
mod tests;

use crate::{
    config::SharedTableConfig,
    error::{ErrorOrigin, InternalError, SharedTableError},
    model::{EntityTypeId, ForeignKeyId, ForeignKeyModel, Model, TableModel},
    obs::sink::{MetricsEvent, record},
};
use std::{fmt::Debug, hash::Hash};
use tracing::warn;

pub use cache::SharedTableCache;
pub use compare::EntryComparator;
pub use registry::{SharedTableCacheFactory, SharedTableRegistry};

///
/// UpdateEntry
///
/// A pending change for one tracked entity instance.
/// Equality and hashing are the entry's stable identity.
///

pub trait UpdateEntry: Clone + Debug + Eq + Hash {
    /// Concrete (possibly derived) entity type of the tracked instance.
    fn entity_type(&self) -> EntityTypeId;
}

///
/// UpdateAdapter
///
/// Change-tracker view used to navigate principal/dependent relationships
/// between tracked entries. Returning nothing is a normal outcome: the
/// related instance is simply not part of the current change set.
///

pub trait UpdateAdapter {
    type Entry: UpdateEntry;

    /// Tracked principal of `entry` along `foreign_key`, if any.
    fn find_principal(
        &self,
        entry: &Self::Entry,
        foreign_key: &ForeignKeyModel,
    ) -> Option<Self::Entry>;

    /// Tracked dependents of `entry` along `foreign_key`.
    fn dependents(&self, entry: &Self::Entry, foreign_key: &ForeignKeyModel) -> Vec<Self::Entry>;
}

///
/// SharedTableContext
///
/// Borrowed inputs for resolving entries of one shared table.
///

pub(crate) struct SharedTableContext<'a, A> {
    pub(crate) model: &'a Model,
    pub(crate) table: &'a TableModel,
    pub(crate) adapter: &'a A,
    pub(crate) config: SharedTableConfig,
}

impl<A> Clone for SharedTableContext<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for SharedTableContext<'_, A> {}

impl<'a, A> SharedTableContext<'a, A> {
    pub(crate) const fn new(
        model: &'a Model,
        table: &'a TableModel,
        adapter: &'a A,
        config: SharedTableConfig,
    ) -> Self {
        Self {
            model,
            table,
            adapter,
            config,
        }
    }

    pub(crate) const fn comparator(&self) -> EntryComparator<'a> {
        EntryComparator::new(self.model, self.table)
    }

    pub(crate) fn entity_type_name(&self, entity_type: EntityTypeId) -> String {
        self.model.entity_type_name(entity_type).to_string()
    }

    // Table foreign key ids always come from the same model.
    pub(crate) fn foreign_key(&self, id: ForeignKeyId) -> Result<&'a ForeignKeyModel, InternalError> {
        self.model.foreign_key(id).ok_or_else(|| {
            InternalError::model_invariant(format!(
                "table {} references unknown foreign key {id}",
                self.table.table_name()
            ))
        })
    }

    // Log, count, and wrap one shared-row violation.
    pub(crate) fn violation(&self, origin: ErrorOrigin, err: SharedTableError) -> InternalError {
        warn!(
            table = %self.table.table_name(),
            %origin,
            error = %err,
            "shared row resolution failed"
        );
        record(MetricsEvent::Violation {
            table: self.table.name(),
        });

        InternalError::shared_table(origin, err)
    }
}
