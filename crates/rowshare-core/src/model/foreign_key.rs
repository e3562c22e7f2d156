use crate::model::EntityTypeId;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ForeignKeyId
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("fk#{_0}")]
#[serde(transparent)]
pub struct ForeignKeyId(u32);

impl ForeignKeyId {
    #[expect(clippy::cast_possible_truncation)]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

///
/// ForeignKeyModel
///
/// One relationship between a dependent and a principal entity type.
/// `shares_row` marks a one-to-one link whose key is also the primary key,
/// which is how table splitting joins two types onto one row.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForeignKeyModel {
    pub(crate) id: ForeignKeyId,
    pub(crate) name: String,
    pub(crate) dependent: EntityTypeId,
    pub(crate) principal: EntityTypeId,
    pub(crate) shares_row: bool,
}

impl ForeignKeyModel {
    #[must_use]
    pub const fn id(&self) -> ForeignKeyId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn dependent(&self) -> EntityTypeId {
        self.dependent
    }

    #[must_use]
    pub const fn principal(&self) -> EntityTypeId {
        self.principal
    }

    #[must_use]
    pub const fn shares_row(&self) -> bool {
        self.shares_row
    }
}
