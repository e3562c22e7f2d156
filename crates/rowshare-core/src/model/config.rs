use crate::{
    error::{InternalError, ModelError},
    model::{EntityTypeId, Model, ModelBuilder, TableName},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

///
/// ModelConfig
///
/// Serializable model description. Entity types, foreign keys, and tables
/// reference each other by name; declaration order of foreign keys is kept.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ModelConfig {
    pub entity_types: Vec<EntityTypeConfig>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyConfig>,
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

///
/// EntityTypeConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityTypeConfig {
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
}

///
/// ForeignKeyConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ForeignKeyConfig {
    pub name: String,
    pub dependent: String,
    pub principal: String,
    #[serde(default)]
    pub shares_row: bool,
}

///
/// TableConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    pub entity_types: Vec<String>,
}

impl Model {
    /// Validate and build a runtime model from its serializable description.
    pub fn from_config(config: &ModelConfig) -> Result<Self, InternalError> {
        let mut builder = ModelBuilder::new();
        let ids = declare_entity_types(&mut builder, &config.entity_types)?;
        let lookup = |name: &str| -> Result<EntityTypeId, InternalError> {
            ids.get(name).copied().ok_or_else(|| {
                ModelError::UnknownEntityType {
                    name: name.to_string(),
                }
                .into()
            })
        };

        for fk in &config.foreign_keys {
            let dependent = lookup(&fk.dependent)?;
            let principal = lookup(&fk.principal)?;
            if fk.shares_row {
                builder.row_sharing_foreign_key(fk.name.clone(), dependent, principal)?;
            } else {
                builder.foreign_key(fk.name.clone(), dependent, principal)?;
            }
        }

        for table in &config.tables {
            let entity_types = table
                .entity_types
                .iter()
                .map(|name| lookup(name))
                .collect::<Result<Vec<_>, _>>()?;
            builder.table(
                TableName::new(table.name.clone(), table.schema.clone()),
                &entity_types,
            )?;
        }

        builder.build()
    }
}

// Declare entity types so every base precedes its derived types, whatever
// order the configuration lists them in.
fn declare_entity_types(
    builder: &mut ModelBuilder,
    configs: &[EntityTypeConfig],
) -> Result<BTreeMap<String, EntityTypeId>, InternalError> {
    let declared: BTreeSet<&str> = configs.iter().map(|c| c.name.as_str()).collect();
    if let Some(missing) = configs
        .iter()
        .filter_map(|c| c.base.as_deref())
        .find(|base| !declared.contains(base))
    {
        return Err(ModelError::UnknownEntityType {
            name: missing.to_string(),
        }
        .into());
    }

    let mut ids = BTreeMap::new();
    let mut pending: Vec<&EntityTypeConfig> = configs.iter().collect();
    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();

        for config in pending {
            let id = match config.base.as_deref() {
                None => builder.entity_type(config.name.clone())?,
                Some(base) => match ids.get(base) {
                    Some(&base_id) => builder.derived_entity_type(config.name.clone(), base_id)?,
                    None => {
                        deferred.push(config);
                        continue;
                    }
                },
            };
            ids.insert(config.name.clone(), id);
        }

        if deferred.len() == before {
            return Err(ModelError::BaseTypeCycle {
                name: deferred[0].name.clone(),
            }
            .into());
        }
        pending = deferred;
    }

    Ok(ids)
}
