//! In-memory change-set fixtures shared by unit tests.

use crate::{
    db::{UpdateAdapter, UpdateEntry},
    model::{EntityTypeId, ForeignKeyId, ForeignKeyModel, Model, TableName},
};

///
/// TestEntry
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct TestEntry {
    pub(crate) id: u32,
    pub(crate) entity_type: EntityTypeId,
}

impl TestEntry {
    pub(crate) const fn new(id: u32, entity_type: EntityTypeId) -> Self {
        Self { id, entity_type }
    }
}

impl UpdateEntry for TestEntry {
    fn entity_type(&self) -> EntityTypeId {
        self.entity_type
    }
}

///
/// TestAdapter
///
/// Tracks principal/dependent links between test entries. A link marked
/// `principal_visible = false` is only reported from the dependent side
/// lookup, which lets tests model an inconsistent change tracker.
///

#[derive(Debug, Default)]
pub(crate) struct TestAdapter {
    links: Vec<Link>,
}

#[derive(Debug)]
struct Link {
    dependent: TestEntry,
    foreign_key: ForeignKeyId,
    principal: TestEntry,
    principal_visible: bool,
}

impl TestAdapter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn link(
        &mut self,
        dependent: TestEntry,
        foreign_key: ForeignKeyId,
        principal: TestEntry,
    ) -> &mut Self {
        self.links.push(Link {
            dependent,
            foreign_key,
            principal,
            principal_visible: true,
        });
        self
    }

    pub(crate) fn dependent_only_link(
        &mut self,
        dependent: TestEntry,
        foreign_key: ForeignKeyId,
        principal: TestEntry,
    ) -> &mut Self {
        self.links.push(Link {
            dependent,
            foreign_key,
            principal,
            principal_visible: false,
        });
        self
    }
}

impl UpdateAdapter for TestAdapter {
    type Entry = TestEntry;

    fn find_principal(
        &self,
        entry: &TestEntry,
        foreign_key: &ForeignKeyModel,
    ) -> Option<TestEntry> {
        self.links
            .iter()
            .find(|link| {
                link.principal_visible
                    && link.dependent == *entry
                    && link.foreign_key == foreign_key.id()
            })
            .map(|link| link.principal)
    }

    fn dependents(&self, entry: &TestEntry, foreign_key: &ForeignKeyModel) -> Vec<TestEntry> {
        self.links
            .iter()
            .filter(|link| link.principal == *entry && link.foreign_key == foreign_key.id())
            .map(|link| link.dependent)
            .collect()
    }
}

///
/// TestRowCommand
/// Stand-in aggregate value recording how it was built.
///

#[derive(Debug)]
pub(crate) struct TestRowCommand {
    pub(crate) serial: usize,
    pub(crate) table: String,
    pub(crate) schema: Option<String>,
    pub(crate) entries: Vec<TestEntry>,
}

impl TestRowCommand {
    pub(crate) fn new(serial: usize, table: &str, schema: Option<&str>) -> Self {
        Self {
            serial,
            table: table.to_string(),
            schema: schema.map(ToString::to_string),
            entries: Vec::new(),
        }
    }
}

///
/// OrdersFixture
///
/// `Order` owns the `sales.Orders` row and `OrderDetails` splits onto it.
/// `Customer` maps alone to `Customers`, which is not shared.
///

pub(crate) struct OrdersFixture {
    pub(crate) model: Model,
    pub(crate) order: EntityTypeId,
    pub(crate) special_order: EntityTypeId,
    pub(crate) details: EntityTypeId,
    pub(crate) customer: EntityTypeId,
    pub(crate) details_fk: ForeignKeyId,
}

impl OrdersFixture {
    pub(crate) fn table_name() -> TableName {
        TableName::new("Orders", Some("sales"))
    }

    pub(crate) fn customers_table_name() -> TableName {
        TableName::new("Customers", None::<&str>)
    }
}

pub(crate) fn orders_fixture() -> OrdersFixture {
    let mut builder = Model::builder();
    let customer = builder.entity_type("Customer").unwrap();
    let order = builder.entity_type("Order").unwrap();
    let special_order = builder.derived_entity_type("SpecialOrder", order).unwrap();
    let details = builder.entity_type("OrderDetails").unwrap();
    builder
        .foreign_key("FK_Order_Customer", order, customer)
        .unwrap();
    let details_fk = builder
        .row_sharing_foreign_key("FK_OrderDetails_Order", details, order)
        .unwrap();
    builder
        .table(OrdersFixture::customers_table_name(), &[customer])
        .unwrap();
    builder
        .table(OrdersFixture::table_name(), &[order, details])
        .unwrap();

    OrdersFixture {
        model: builder.build().unwrap(),
        order,
        special_order,
        details,
        customer,
        details_fk,
    }
}

///
/// ChainFixture
///
/// `len` entity types `T0 <- T1 <- ... ` splitting one `Chain` row, where
/// `types[i + 1]` depends on `types[i]` through `fks[i]`.
///

pub(crate) struct ChainFixture {
    pub(crate) model: Model,
    pub(crate) types: Vec<EntityTypeId>,
    pub(crate) fks: Vec<ForeignKeyId>,
}

impl ChainFixture {
    pub(crate) fn table_name() -> TableName {
        TableName::new("Chain", None::<&str>)
    }

    /// Entries `0..len`, one per type, linked along the whole chain.
    pub(crate) fn linked_entries(&self) -> (Vec<TestEntry>, TestAdapter) {
        let entries: Vec<_> = self
            .types
            .iter()
            .zip(0u32..)
            .map(|(&entity_type, id)| TestEntry::new(id, entity_type))
            .collect();

        let mut adapter = TestAdapter::new();
        for (i, &fk) in self.fks.iter().enumerate() {
            adapter.link(entries[i + 1], fk, entries[i]);
        }

        (entries, adapter)
    }
}

pub(crate) fn chain_fixture(len: usize) -> ChainFixture {
    let mut builder = Model::builder();
    let types: Vec<_> = (0..len)
        .map(|i| builder.entity_type(format!("T{i}")).unwrap())
        .collect();
    let fks: Vec<_> = types
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            builder
                .row_sharing_foreign_key(format!("FK_T{}_T{i}", i + 1), pair[1], pair[0])
                .unwrap()
        })
        .collect();
    builder.table(ChainFixture::table_name(), &types).unwrap();

    ChainFixture {
        model: builder.build().unwrap(),
        types,
        fks,
    }
}
