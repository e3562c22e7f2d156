use crate::model::{EntityTypeId, ForeignKeyId};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// TableName
///
/// Physical table identity: name plus optional schema.
/// Displays as `schema.name`, or `name` when no schema is set.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TableName {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
}

impl TableName {
    pub fn new(name: impl Into<String>, schema: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            schema: schema.map(Into::into),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

///
/// TableModel
///
/// Runtime metadata for one physical table.
///
/// Internal foreign keys are keyed by the *root* entity type on each side and
/// keep declaration order; first-match resolution depends on that order.
/// A type with no internal foreign keys has no map entry at all, so lookups
/// return `None` rather than an empty slice.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableModel {
    pub(crate) name: TableName,
    pub(crate) entity_types: Vec<EntityTypeId>,
    pub(crate) internal_foreign_keys: BTreeMap<EntityTypeId, Vec<ForeignKeyId>>,
    pub(crate) referencing_internal_foreign_keys: BTreeMap<EntityTypeId, Vec<ForeignKeyId>>,
}

impl TableModel {
    pub(crate) const fn new(name: TableName) -> Self {
        Self {
            name,
            entity_types: Vec::new(),
            internal_foreign_keys: BTreeMap::new(),
            referencing_internal_foreign_keys: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn table_name(&self) -> &TableName {
        &self.name
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.name()
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.name.schema()
    }

    /// Entity types mapped to this table, in mapping order.
    #[must_use]
    pub fn entity_types(&self) -> &[EntityTypeId] {
        &self.entity_types
    }

    /// Returns `true` when more than one entity type maps to this table.
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        self.entity_types.len() > 1
    }

    /// Foreign keys from `entity_type` toward a principal sharing the row.
    #[must_use]
    pub fn internal_foreign_keys(&self, entity_type: EntityTypeId) -> Option<&[ForeignKeyId]> {
        self.internal_foreign_keys
            .get(&entity_type)
            .map(Vec::as_slice)
    }

    /// Foreign keys from dependents sharing the row toward `entity_type`.
    #[must_use]
    pub fn referencing_internal_foreign_keys(
        &self,
        entity_type: EntityTypeId,
    ) -> Option<&[ForeignKeyId]> {
        self.referencing_internal_foreign_keys
            .get(&entity_type)
            .map(Vec::as_slice)
    }

    pub(crate) fn maps(&self, entity_type: EntityTypeId) -> bool {
        self.entity_types.contains(&entity_type)
    }
}
