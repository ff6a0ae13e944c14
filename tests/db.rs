use diesel::connection::SimpleConnection;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn test_price_and_quantity_cannot_be_negative_in_storage() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("connection");

    let negative_quantity = conn.batch_execute(
        "INSERT INTO products (product_code, name, category, price_cents, quantity, created_at)
         VALUES ('X-1', 'Broken', 'Misc', 100, -1, CURRENT_TIMESTAMP)",
    );
    assert!(negative_quantity.is_err());

    let negative_price = conn.batch_execute(
        "INSERT INTO products (product_code, name, category, price_cents, quantity, created_at)
         VALUES ('X-2', 'Broken', 'Misc', -100, 1, CURRENT_TIMESTAMP)",
    );
    assert!(negative_price.is_err());
}
