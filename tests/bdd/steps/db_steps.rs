use cucumber::gherkin::Step;
use cucumber::{given, then};
use serde_json::{Map, Value};

use crate::StagehandWorld;

/// Table cells are strings; coerce numeric-looking values so they compare
/// against INTEGER and REAL columns.
fn expected_row(step: &Step) -> Value {
    let table = step.table.as_ref().expect("a column/value table is required");
    let pairs = stagehand::table::rows_hash(&table.rows).unwrap_or_else(|e| panic!("{e}"));
    let mut object = Map::new();
    for (column, raw) in pairs {
        let value = if let Ok(int) = raw.parse::<i64>() {
            Value::from(int)
        } else if let Ok(float) = raw.parse::<f64>() {
            Value::from(float)
        } else {
            Value::String(raw)
        };
        object.insert(column, value);
    }
    Value::Object(object)
}

#[given("an empty orders database")]
async fn an_empty_orders_database(world: &mut StagehandWorld) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("demo.db");
    let conn = rusqlite::Connection::open(&db_path).expect("failed to create database");
    conn.execute_batch(
        "CREATE TABLE orders (
            id       INTEGER PRIMARY KEY,
            customer TEXT NOT NULL,
            total    REAL NOT NULL,
            status   TEXT NOT NULL DEFAULT 'new'
        );",
    )
    .expect("failed to create schema");
    world.db_path = Some(db_path);
    // Keep the TempDir alive for the lifetime of the scenario.
    world.db_dir = Some(dir);
}

#[given(expr = "an order from {string} with total {float}")]
async fn an_order_from(world: &mut StagehandWorld, customer: String, total: f64) {
    let conn = world.open_db();
    conn.execute(
        "INSERT INTO orders (customer, total) VALUES (?1, ?2)",
        rusqlite::params![customer, total],
    )
    .expect("failed to insert order");
}

#[then("the database contains an order")]
async fn the_database_contains_an_order(world: &mut StagehandWorld, step: &Step) {
    let expected = expected_row(step);
    let conn = world.open_db();
    stagehand::db::assert_row(&conn, "orders", &expected).unwrap_or_else(|e| panic!("{e}"));
}

#[then("the database contains no order")]
async fn the_database_contains_no_order(world: &mut StagehandWorld, step: &Step) {
    let expected = expected_row(step);
    let conn = world.open_db();
    stagehand::db::assert_no_row(&conn, "orders", &expected).unwrap_or_else(|e| panic!("{e}"));
}

#[given("the orders table is emptied")]
async fn the_orders_table_is_emptied(world: &mut StagehandWorld) {
    let conn = world.open_db();
    stagehand::db::reset_table(&conn, "orders").unwrap_or_else(|e| panic!("{e}"));
}
