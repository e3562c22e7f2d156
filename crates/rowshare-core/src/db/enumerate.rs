//! Row membership: every tracked entry contributing columns to one row.

use crate::{
    db::{SharedTableContext, UpdateAdapter, UpdateEntry, resolve::resolve_main_entry},
    error::{ErrorOrigin, InternalError, SharedTableError},
    obs::sink::{MetricsEvent, record},
};
use std::collections::HashSet;
use tracing::trace;

/// Collect the main entry of `entry`'s row followed by all of its dependents.
///
/// The walk is depth-first pre-order: each dependent is immediately followed
/// by its own dependents, and siblings follow foreign key declaration order.
/// A dependent joined to the row through more than one principal is listed
/// once, at its first position.
pub(crate) fn collect_row_entries<A: UpdateAdapter>(
    ctx: &SharedTableContext<'_, A>,
    entry: &A::Entry,
) -> Result<Vec<A::Entry>, InternalError> {
    let main = resolve_main_entry(ctx, entry)?;

    let mut walk = RowWalk {
        path: HashSet::new(),
        listed: HashSet::new(),
        entries: Vec::new(),
    };
    walk.add_dependents_inclusive(ctx, main)?;

    record(MetricsEvent::RowEnumerated {
        table: ctx.table.name(),
        entries: walk.entries.len() as u64,
    });

    Ok(walk.entries)
}

///
/// RowWalk
///
/// `path` holds the entries between the main entry and the current one;
/// `listed` holds every entry already pushed onto `entries`.
///

struct RowWalk<E> {
    path: HashSet<E>,
    listed: HashSet<E>,
    entries: Vec<E>,
}

impl<E: UpdateEntry> RowWalk<E> {
    fn add_dependents_inclusive<A>(
        &mut self,
        ctx: &SharedTableContext<'_, A>,
        entry: E,
    ) -> Result<(), InternalError>
    where
        A: UpdateAdapter<Entry = E>,
    {
        if self.path.contains(&entry) {
            return Err(ctx.violation(
                ErrorOrigin::Enumerate,
                SharedTableError::CyclicDependentChain {
                    table: ctx.table.table_name().clone(),
                    entity_type: ctx.entity_type_name(entry.entity_type()),
                },
            ));
        }
        if !self.listed.insert(entry.clone()) {
            trace!(
                table = %ctx.table.table_name(),
                entity_type = ctx.model.entity_type_name(entry.entity_type()),
                "dependent already listed through another principal"
            );
            return Ok(());
        }

        self.path.insert(entry.clone());
        if self.path.len() > ctx.config.max_chain_depth {
            return Err(ctx.violation(
                ErrorOrigin::Enumerate,
                SharedTableError::ChainTooDeep {
                    table: ctx.table.table_name().clone(),
                    max_depth: ctx.config.max_chain_depth,
                },
            ));
        }

        self.entries.push(entry.clone());
        self.add_dependents(ctx, &entry)?;
        self.path.remove(&entry);

        Ok(())
    }

    fn add_dependents<A>(
        &mut self,
        ctx: &SharedTableContext<'_, A>,
        entry: &E,
    ) -> Result<(), InternalError>
    where
        A: UpdateAdapter<Entry = E>,
    {
        let root = ctx.model.root_type(entry.entity_type());
        let Some(foreign_keys) = ctx.table.referencing_internal_foreign_keys(root) else {
            return Ok(());
        };

        for &fk_id in foreign_keys {
            let foreign_key = ctx.foreign_key(fk_id)?;
            let mut dependents = ctx.adapter.dependents(entry, foreign_key);

            // At most one tracked dependent per internal foreign key.
            if dependents.len() > 1 {
                return Err(ctx.violation(
                    ErrorOrigin::Enumerate,
                    SharedTableError::MultipleDependents {
                        table: ctx.table.table_name().clone(),
                        entity_type: ctx.entity_type_name(entry.entity_type()),
                        foreign_key: foreign_key.name().to_string(),
                        count: dependents.len(),
                    },
                ));
            }
            if let Some(dependent) = dependents.pop() {
                self.add_dependents_inclusive(ctx, dependent)?;
            }
        }

        Ok(())
    }
}
