//! Module: model
//! Responsibility: read-only entity/table metadata consumed by shared-row resolution.
//! Does not own: change tracking, entry identity, or row assembly.
//! Boundary: built once per model (builder or configuration), then borrowed by caches.
//!
//! Invariants:
//! - Every entity type carries an explicit root type; derived types never
//!   appear as keys of the internal foreign key maps.
//! - An entity type maps to at most one table.
//! - Internal foreign key order is the declaration order of the foreign keys.

mod builder;
mod config;
mod entity;
mod foreign_key;
mod table;


pub use builder::ModelBuilder;
pub use config::{EntityTypeConfig, ForeignKeyConfig, ModelConfig, TableConfig};
pub use entity::{EntityTypeId, EntityTypeModel};
pub use foreign_key::{ForeignKeyId, ForeignKeyModel};
pub use table::{TableModel, TableName};

///
/// Model
///
/// Immutable runtime model: entity types, foreign keys, and table mappings.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Model {
    pub(crate) entity_types: Vec<EntityTypeModel>,
    pub(crate) foreign_keys: Vec<ForeignKeyModel>,
    pub(crate) tables: Vec<TableModel>,
}

impl Model {
    #[must_use]
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    #[must_use]
    pub fn entity_types(&self) -> &[EntityTypeModel] {
        &self.entity_types
    }

    #[must_use]
    pub fn entity_type(&self, id: EntityTypeId) -> Option<&EntityTypeModel> {
        self.entity_types.get(id.index())
    }

    #[must_use]
    pub fn entity_type_by_name(&self, name: &str) -> Option<&EntityTypeModel> {
        self.entity_types.iter().find(|entity| entity.name == name)
    }

    /// Root of `id`'s inheritance hierarchy.
    ///
    /// Ids not issued by this model resolve to themselves; table lookups for
    /// them then simply find no internal foreign keys.
    #[must_use]
    pub fn root_type(&self, id: EntityTypeId) -> EntityTypeId {
        self.entity_type(id).map_or(id, EntityTypeModel::root)
    }

    /// Entity type name, or the empty string for an unknown id.
    #[must_use]
    pub fn entity_type_name(&self, id: EntityTypeId) -> &str {
        self.entity_type(id).map_or("", EntityTypeModel::name)
    }

    #[must_use]
    pub fn foreign_keys(&self) -> &[ForeignKeyModel] {
        &self.foreign_keys
    }

    #[must_use]
    pub fn foreign_key(&self, id: ForeignKeyId) -> Option<&ForeignKeyModel> {
        self.foreign_keys.get(id.index())
    }

    #[must_use]
    pub fn tables(&self) -> &[TableModel] {
        &self.tables
    }

    #[must_use]
    pub fn table(&self, name: &TableName) -> Option<&TableModel> {
        self.tables.iter().find(|table| &table.name == name)
    }

    /// Table that `entity_type` maps to, if any.
    #[must_use]
    pub fn table_for(&self, entity_type: EntityTypeId) -> Option<&TableModel> {
        self.tables.iter().find(|table| table.maps(entity_type))
    }
}
