use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// EntityTypeId
///
/// Dense handle for one entity type inside a [`Model`](super::Model).
/// Only meaningful against the model that issued it.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("entity#{_0}")]
#[serde(transparent)]
pub struct EntityTypeId(u32);

impl EntityTypeId {
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
/// EntityTypeModel
/// Runtime metadata for one entity type in an inheritance hierarchy.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityTypeModel {
    pub(crate) id: EntityTypeId,
    pub(crate) name: String,
    pub(crate) base: Option<EntityTypeId>,
    /// Top of the hierarchy; computed once when the model is built.
    pub(crate) root: EntityTypeId,
}

impl EntityTypeModel {
    #[must_use]
    pub const fn id(&self) -> EntityTypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn base(&self) -> Option<EntityTypeId> {
        self.base
    }

    #[must_use]
    pub const fn root(&self) -> EntityTypeId {
        self.root
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.base.is_none()
    }
}
