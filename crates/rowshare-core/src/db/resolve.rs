//! Main-entry resolution: climb internal foreign keys to the row owner.

use crate::{
    db::{SharedTableContext, UpdateAdapter, UpdateEntry},
    error::{ErrorOrigin, InternalError, SharedTableError},
    obs::sink::{MetricsEvent, record},
};
use std::collections::HashSet;
use tracing::trace;

/// Resolve the main entry of the row `entry` contributes to.
///
/// Internal foreign keys are tried in declaration order and the first one
/// with a tracked principal is followed; an entry without one is main.
pub(crate) fn resolve_main_entry<A: UpdateAdapter>(
    ctx: &SharedTableContext<'_, A>,
    entry: &A::Entry,
) -> Result<A::Entry, InternalError> {
    let mut path = HashSet::new();
    let main = climb_principals(ctx, entry.clone(), &mut path)?;

    trace!(
        table = %ctx.table.table_name(),
        entity_type = ctx.model.entity_type_name(entry.entity_type()),
        chain_len = path.len(),
        "resolved main entry"
    );
    record(MetricsEvent::Resolve {
        table: ctx.table.name(),
        chain_len: path.len() as u64,
    });

    Ok(main)
}

// `path` holds every entry visited on the way up from the submitted entry.
fn climb_principals<A: UpdateAdapter>(
    ctx: &SharedTableContext<'_, A>,
    entry: A::Entry,
    path: &mut HashSet<A::Entry>,
) -> Result<A::Entry, InternalError> {
    if !path.insert(entry.clone()) {
        return Err(ctx.violation(
            ErrorOrigin::Resolve,
            SharedTableError::CyclicPrincipalChain {
                table: ctx.table.table_name().clone(),
                entity_type: ctx.entity_type_name(entry.entity_type()),
            },
        ));
    }
    if path.len() > ctx.config.max_chain_depth {
        return Err(ctx.violation(
            ErrorOrigin::Resolve,
            SharedTableError::ChainTooDeep {
                table: ctx.table.table_name().clone(),
                max_depth: ctx.config.max_chain_depth,
            },
        ));
    }

    let root = ctx.model.root_type(entry.entity_type());
    let Some(foreign_keys) = ctx.table.internal_foreign_keys(root) else {
        return Ok(entry);
    };

    for &fk_id in foreign_keys {
        let foreign_key = ctx.foreign_key(fk_id)?;
        if let Some(principal) = ctx.adapter.find_principal(&entry, foreign_key) {
            return climb_principals(ctx, principal, path);
        }
    }

    Ok(entry)
}
