mod property;

use crate::{
    config::SharedTableConfig,
    db::SharedTableContext,
    model::{Model, TableName},
    test_support::TestAdapter,
};

// Borrow a context for `table` with an explicit configuration.
fn context<'a>(
    model: &'a Model,
    table: &TableName,
    adapter: &'a TestAdapter,
    config: SharedTableConfig,
) -> SharedTableContext<'a, TestAdapter> {
    let table = model.table(table).unwrap();

    SharedTableContext::new(model, table, adapter, config)
}
