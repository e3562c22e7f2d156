use crate::{
    db::UpdateEntry,
    model::{EntityTypeId, Model, TableModel},
};
use std::cmp::Ordering;

///
/// EntryComparator
///
/// Total order over entries of one shared table: entries of the row-owning
/// (main) entity type first, then ordinal entity type name.
///
/// Handed to every aggregate value so command assembly can order the
/// contributions of a row without knowing the table metadata.
///

#[derive(Clone, Copy, Debug)]
pub struct EntryComparator<'a> {
    model: &'a Model,
    table: &'a TableModel,
}

impl<'a> EntryComparator<'a> {
    pub(crate) const fn new(model: &'a Model, table: &'a TableModel) -> Self {
        Self { model, table }
    }

    /// Returns `true` when `entity_type` has no internal foreign keys in this
    /// table, i.e. it owns the row.
    #[must_use]
    pub fn is_main_entity_type(&self, entity_type: EntityTypeId) -> bool {
        self.table
            .internal_foreign_keys(self.model.root_type(entity_type))
            .is_none()
    }

    #[must_use]
    pub fn compare<E: UpdateEntry>(&self, x: &E, y: &E) -> Ordering {
        let (x_type, y_type) = (x.entity_type(), y.entity_type());

        // `true` sorts after `false`, so compare y against x to put main first.
        self.is_main_entity_type(y_type)
            .cmp(&self.is_main_entity_type(x_type))
            .then_with(|| {
                self.model
                    .entity_type_name(x_type)
                    .cmp(self.model.entity_type_name(y_type))
            })
    }

    /// Stable sort of `entries` by [`Self::compare`].
    pub fn sort_entries<E: UpdateEntry>(&self, entries: &mut [E]) {
        entries.sort_by(|x, y| self.compare(x, y));
    }
}
