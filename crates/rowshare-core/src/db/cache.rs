use crate::{
    config::SharedTableConfig,
    db::{
        EntryComparator, SharedTableContext, UpdateAdapter, UpdateEntry,
        enumerate::collect_row_entries, resolve::resolve_main_entry,
    },
    error::{ErrorOrigin, InternalError, SharedTableError},
    model::{EntityTypeId, Model, TableModel},
    obs::sink::{MetricsEvent, record},
};
use std::collections::HashMap;
use tracing::debug;

///
/// SharedTableCache
///
/// Operation-scoped map from main entry to aggregate value for one shared
/// table. Values are created lazily by `create_value` and handed out as
/// `&mut V`, so every entry of a row accumulates into the same slot.
///
/// Build one per persistence operation and drop it when the operation ends;
/// it is not meant to be shared across threads or reused.
///

pub struct SharedTableCache<'a, A, V, F>
where
    A: UpdateAdapter,
{
    ctx: SharedTableContext<'a, A>,
    create_value: F,
    slots: HashMap<A::Entry, usize>,
    values: Vec<(A::Entry, V)>,
}

impl<'a, A, V, F> SharedTableCache<'a, A, V, F>
where
    A: UpdateAdapter,
    F: FnMut(&str, Option<&str>, EntryComparator<'a>) -> V,
{
    /// Build a cache for `table` with the default configuration.
    pub fn new(
        model: &'a Model,
        table: &'a TableModel,
        adapter: &'a A,
        create_value: F,
    ) -> Result<Self, InternalError> {
        Self::with_config(
            model,
            table,
            adapter,
            SharedTableConfig::default(),
            create_value,
        )
    }

    /// Build a cache for `table`; fails when the table is not shared.
    pub fn with_config(
        model: &'a Model,
        table: &'a TableModel,
        adapter: &'a A,
        config: SharedTableConfig,
        create_value: F,
    ) -> Result<Self, InternalError> {
        if !table.is_shared() {
            return Err(InternalError::shared_table(
                ErrorOrigin::Cache,
                SharedTableError::TableNotShared {
                    table: table.table_name().clone(),
                },
            ));
        }

        Ok(Self::from_context(
            SharedTableContext::new(model, table, adapter, config),
            create_value,
        ))
    }

    pub(crate) fn from_context(ctx: SharedTableContext<'a, A>, create_value: F) -> Self {
        Self {
            ctx,
            create_value,
            slots: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Aggregate value for the row `entry` belongs to, created on first use.
    ///
    /// An existing value is returned untouched.
    pub fn get_or_add(&mut self, entry: &A::Entry) -> Result<&mut V, InternalError> {
        let main = resolve_main_entry(&self.ctx, entry)?;

        if let Some(slot) = self.slots.get(&main).copied() {
            record(MetricsEvent::CacheHit {
                table: self.ctx.table.name(),
            });

            return Ok(&mut self.values[slot].1);
        }

        let table = self.ctx.table;
        let value = (self.create_value)(table.name(), table.schema(), self.ctx.comparator());
        debug!(
            table = %table.table_name(),
            main_entity_type = self.ctx.model.entity_type_name(main.entity_type()),
            rows = self.values.len() + 1,
            "created shared row value"
        );
        record(MetricsEvent::CacheMiss {
            table: table.name(),
        });

        let slot = self.values.len();
        self.slots.insert(main.clone(), slot);
        self.values.push((main, value));

        Ok(&mut self.values[slot].1)
    }
}

impl<'a, A, V, F> SharedTableCache<'a, A, V, F>
where
    A: UpdateAdapter,
{
    /// Main entry of the row `entry` belongs to.
    pub fn main_entry(&self, entry: &A::Entry) -> Result<A::Entry, InternalError> {
        resolve_main_entry(&self.ctx, entry)
    }

    /// Every entry contributing to the row `entry` belongs to, main first.
    pub fn all_entries(&self, entry: &A::Entry) -> Result<Vec<A::Entry>, InternalError> {
        collect_row_entries(&self.ctx, entry)
    }

    #[must_use]
    pub fn is_main_entity_type(&self, entity_type: EntityTypeId) -> bool {
        self.ctx.comparator().is_main_entity_type(entity_type)
    }

    #[must_use]
    pub const fn comparator(&self) -> EntryComparator<'a> {
        self.ctx.comparator()
    }

    #[must_use]
    pub const fn table(&self) -> &'a TableModel {
        self.ctx.table
    }

    #[must_use]
    pub const fn config(&self) -> SharedTableConfig {
        self.ctx.config
    }

    /// Number of rows (main entries) seen so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Aggregate values in creation order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.values.iter().map(|(_, value)| value)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.values.iter_mut().map(|(_, value)| value)
    }

    /// Main entries paired with their aggregate values, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&A::Entry, &V)> {
        self.values.iter().map(|(main, value)| (main, value))
    }

    /// Consume the cache, yielding aggregate values in creation order.
    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.values.into_iter().map(|(_, value)| value)
    }
}
