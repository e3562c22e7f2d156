use crate::{
    config::SharedTableConfig,
    db::{EntryComparator, SharedTableCache, SharedTableContext, UpdateAdapter},
    error::{ErrorOrigin, InternalError, SharedTableError},
    model::{Model, TableModel, TableName},
};
use std::collections::BTreeMap;
use tracing::debug;

///
/// SharedTableCacheFactory
///
/// Builds fresh, operation-scoped caches for one shared table.
/// Lives as long as the model; each persistence operation calls
/// [`Self::create`] for the tables it touches.
///

pub struct SharedTableCacheFactory<'a, A> {
    ctx: SharedTableContext<'a, A>,
}

impl<A> Clone for SharedTableCacheFactory<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for SharedTableCacheFactory<'_, A> {}

impl<'a, A: UpdateAdapter> SharedTableCacheFactory<'a, A> {
    /// Factory for a single table; fails when the table is not shared.
    pub fn for_table(
        model: &'a Model,
        table: &'a TableModel,
        adapter: &'a A,
        config: SharedTableConfig,
    ) -> Result<Self, InternalError> {
        if !table.is_shared() {
            return Err(InternalError::shared_table(
                ErrorOrigin::Registry,
                SharedTableError::TableNotShared {
                    table: table.table_name().clone(),
                },
            ));
        }

        Ok(Self {
            ctx: SharedTableContext::new(model, table, adapter, config),
        })
    }

    #[must_use]
    pub const fn table(&self) -> &'a TableModel {
        self.ctx.table
    }

    /// New empty cache whose aggregate values come from `create_value`.
    pub fn create<V, F>(&self, create_value: F) -> SharedTableCache<'a, A, V, F>
    where
        F: FnMut(&str, Option<&str>, EntryComparator<'a>) -> V,
    {
        SharedTableCache::from_context(self.ctx, create_value)
    }
}

///
/// SharedTableRegistry
///
/// One cache factory per shared table of a model, keyed by table name and
/// schema. Non-shared tables never get a factory.
///

pub struct SharedTableRegistry<'a, A> {
    factories: BTreeMap<TableName, SharedTableCacheFactory<'a, A>>,
}

impl<'a, A: UpdateAdapter> SharedTableRegistry<'a, A> {
    pub fn build(model: &'a Model, adapter: &'a A) -> Result<Self, InternalError> {
        Self::build_with_config(model, adapter, SharedTableConfig::default())
    }

    pub fn build_with_config(
        model: &'a Model,
        adapter: &'a A,
        config: SharedTableConfig,
    ) -> Result<Self, InternalError> {
        let mut factories = BTreeMap::new();
        for table in model.tables().iter().filter(|table| table.is_shared()) {
            let factory = SharedTableCacheFactory::for_table(model, table, adapter, config)?;
            if factories
                .insert(table.table_name().clone(), factory)
                .is_some()
            {
                return Err(InternalError::model_invariant(format!(
                    "duplicate shared table {}",
                    table.table_name()
                )));
            }
        }
        debug!(
            shared_tables = factories.len(),
            tables = model.tables().len(),
            "built shared table registry"
        );

        Ok(Self { factories })
    }

    #[must_use]
    pub fn get(&self, table: &TableName) -> Option<&SharedTableCacheFactory<'a, A>> {
        self.factories.get(table)
    }

    #[must_use]
    pub fn get_by_name(
        &self,
        name: &str,
        schema: Option<&str>,
    ) -> Option<&SharedTableCacheFactory<'a, A>> {
        self.factories.get(&TableName::new(name, schema))
    }

    #[must_use]
    pub fn contains(&self, table: &TableName) -> bool {
        self.factories.contains_key(table)
    }

    /// Factories in table-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&TableName, &SharedTableCacheFactory<'a, A>)> {
        self.factories.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
