//! Core runtime for rowshare: shared-table metadata, main-entry resolution,
//! per-row aggregate caches, and the observability hooks around them.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default bound on the number of entries a principal or dependent chain may
/// span inside one shared row.
///
/// Real table-splitting chains are a handful of levels deep; anything longer
/// is treated as misconfigured metadata.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::SharedTableConfig,
        db::{
            EntryComparator, SharedTableCache, SharedTableCacheFactory, SharedTableRegistry,
            UpdateAdapter, UpdateEntry,
        },
        model::{EntityTypeId, ForeignKeyId, Model, ModelBuilder, TableModel, TableName},
    };
}
