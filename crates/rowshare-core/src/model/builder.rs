use crate::{
    error::{InternalError, ModelError},
    model::{
        EntityTypeId, EntityTypeModel, ForeignKeyId, ForeignKeyModel, Model, TableModel, TableName,
    },
};

///
/// ModelBuilder
///
/// Incremental model construction. Base types must be declared before the
/// types deriving from them, so root types are known at declaration time.
///

#[derive(Debug, Default)]
pub struct ModelBuilder {
    entity_types: Vec<EntityTypeModel>,
    foreign_keys: Vec<ForeignKeyModel>,
    tables: Vec<TableModel>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a root entity type.
    pub fn entity_type(&mut self, name: impl Into<String>) -> Result<EntityTypeId, InternalError> {
        self.add_entity_type(name.into(), None)
    }

    /// Declare an entity type deriving from `base`.
    pub fn derived_entity_type(
        &mut self,
        name: impl Into<String>,
        base: EntityTypeId,
    ) -> Result<EntityTypeId, InternalError> {
        self.add_entity_type(name.into(), Some(base))
    }

    /// Declare a regular foreign key (never internal to a shared row).
    pub fn foreign_key(
        &mut self,
        name: impl Into<String>,
        dependent: EntityTypeId,
        principal: EntityTypeId,
    ) -> Result<ForeignKeyId, InternalError> {
        self.add_foreign_key(name.into(), dependent, principal, false)
    }

    /// Declare a one-to-one foreign key that joins `dependent` onto the
    /// principal's row when both map to the same table.
    pub fn row_sharing_foreign_key(
        &mut self,
        name: impl Into<String>,
        dependent: EntityTypeId,
        principal: EntityTypeId,
    ) -> Result<ForeignKeyId, InternalError> {
        self.add_foreign_key(name.into(), dependent, principal, true)
    }

    /// Map entity types onto one table.
    ///
    /// Types deriving from a mapped type and not mapped elsewhere join the
    /// same table when the model is built.
    pub fn table(
        &mut self,
        name: TableName,
        entity_types: &[EntityTypeId],
    ) -> Result<(), InternalError> {
        if name.name.is_empty() {
            return Err(ModelError::EmptyName { kind: "table" }.into());
        }
        if self.tables.iter().any(|table| table.name == name) {
            return Err(ModelError::DuplicateTable { table: name }.into());
        }

        let mut table = TableModel::new(name);
        for &entity_type in entity_types {
            let entity = self.entity_type_model(entity_type)?;
            if let Some(existing) = self.tables.iter().find(|t| t.maps(entity_type)) {
                return Err(ModelError::EntityTypeMappedTwice {
                    name: entity.name.clone(),
                    first: existing.name.clone(),
                    second: table.name,
                }
                .into());
            }
            if !table.maps(entity_type) {
                table.entity_types.push(entity_type);
            }
        }
        self.tables.push(table);

        Ok(())
    }

    /// Finish the model: map derived types and derive internal foreign keys.
    pub fn build(mut self) -> Result<Model, InternalError> {
        self.map_derived_types();
        self.derive_internal_foreign_keys();

        Ok(Model {
            entity_types: self.entity_types,
            foreign_keys: self.foreign_keys,
            tables: self.tables,
        })
    }

    fn add_entity_type(
        &mut self,
        name: String,
        base: Option<EntityTypeId>,
    ) -> Result<EntityTypeId, InternalError> {
        if name.is_empty() {
            return Err(ModelError::EmptyName {
                kind: "entity type",
            }
            .into());
        }
        if self.entity_types.iter().any(|entity| entity.name == name) {
            return Err(ModelError::DuplicateEntityType { name }.into());
        }

        let id = EntityTypeId::from_index(self.entity_types.len());
        let root = match base {
            Some(base) => self.entity_type_model(base)?.root,
            None => id,
        };
        self.entity_types.push(EntityTypeModel {
            id,
            name,
            base,
            root,
        });

        Ok(id)
    }

    fn add_foreign_key(
        &mut self,
        name: String,
        dependent: EntityTypeId,
        principal: EntityTypeId,
        shares_row: bool,
    ) -> Result<ForeignKeyId, InternalError> {
        if name.is_empty() {
            return Err(ModelError::EmptyName {
                kind: "foreign key",
            }
            .into());
        }
        if self.foreign_keys.iter().any(|fk| fk.name == name) {
            return Err(ModelError::DuplicateForeignKey { name }.into());
        }
        self.entity_type_model(dependent)?;
        self.entity_type_model(principal)?;

        let id = ForeignKeyId::from_index(self.foreign_keys.len());
        self.foreign_keys.push(ForeignKeyModel {
            id,
            name,
            dependent,
            principal,
            shares_row,
        });

        Ok(id)
    }

    fn entity_type_model(&self, id: EntityTypeId) -> Result<&EntityTypeModel, InternalError> {
        self.entity_types
            .get(id.index())
            .ok_or_else(|| ModelError::UnknownEntityTypeId { id }.into())
    }

    // Derived types follow their nearest mapped ancestor unless they were
    // mapped explicitly. Bases are declared first, so an implicitly mapped
    // base is already in place when its own derived types are visited.
    fn map_derived_types(&mut self) {
        for entity in &self.entity_types {
            if entity.is_root() || self.tables.iter().any(|t| t.maps(entity.id)) {
                continue;
            }

            let mut ancestor = entity.base;
            while let Some(base) = ancestor {
                if let Some(table) = self.tables.iter_mut().find(|t| t.maps(base)) {
                    table.entity_types.push(entity.id);
                    break;
                }
                ancestor = self.entity_types[base.index()].base;
            }
        }
    }

    // A row-sharing foreign key is internal to a table when both of its root
    // types map to that table.
    fn derive_internal_foreign_keys(&mut self) {
        for fk in self.foreign_keys.iter().filter(|fk| fk.shares_row) {
            let dependent_root = self.entity_types[fk.dependent.index()].root;
            let principal_root = self.entity_types[fk.principal.index()].root;

            let Some(table) = self
                .tables
                .iter_mut()
                .find(|t| t.maps(dependent_root) && t.maps(principal_root))
            else {
                continue;
            };

            table
                .internal_foreign_keys
                .entry(dependent_root)
                .or_default()
                .push(fk.id);
            table
                .referencing_internal_foreign_keys
                .entry(principal_root)
                .or_default()
                .push(fk.id);
        }
    }
}
