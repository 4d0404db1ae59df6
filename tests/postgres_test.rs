//! Integration tests against PostgreSQL.

use askdb::config::DatabaseConfig;
use askdb::db::{DbPool, QueryExecutor, SchemaInspector};
use serde_json::{Value, json};

/// Test that requires a running PostgreSQL database.
/// Set TEST_POSTGRES_URL environment variable to run this test.
#[tokio::test]
async fn test_postgres_schema_and_value_decoding() {
    let postgres_url = match std::env::var("TEST_POSTGRES_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: TEST_POSTGRES_URL not set");
            return;
        }
    };

    let config = DatabaseConfig::parse(&postgres_url)
        .unwrap()
        .with_schema("askdb_test");
    let pool = DbPool::connect_lazy(&config).unwrap();
    let executor = QueryExecutor::new(pool.clone());

    // Setup
    for stmt in [
        "DROP SCHEMA IF EXISTS askdb_test CASCADE",
        "CREATE SCHEMA askdb_test",
        r#"CREATE TABLE askdb_test."Vendor" (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TIMESTAMP,
            external_id UUID,
            active BOOLEAN
        )"#,
        r#"CREATE TABLE askdb_test."Invoice" (
            id BIGINT PRIMARY KEY,
            "vendorId" INTEGER,
            amount NUMERIC(12, 2),
            meta JSONB
        )"#,
        r#"INSERT INTO askdb_test."Vendor" VALUES
            (1, '供应商', '2024-03-01 12:30:00', 'a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11', true),
            (2, 'Globex', NULL, NULL, false)"#,
        r#"INSERT INTO askdb_test."Invoice" VALUES (10, 1, 1250.50, '{"late": true}')"#,
    ] {
        executor.execute(stmt).await.expect("setup statement failed");
    }

    // Schema capture is scoped to the configured schema
    let snapshot = SchemaInspector::capture(&pool, &config.schema).await.unwrap();
    let tables: Vec<&str> = snapshot.table_names().collect();
    assert_eq!(tables, vec!["Invoice", "Vendor"]);
    let invoice = snapshot.columns("Invoice").unwrap();
    assert_eq!(invoice[1].to_string(), "\"vendorId\" (integer)");
    assert_eq!(invoice[2].data_type, "numeric");

    // Value decoding
    let rows = executor
        .execute(r#"SELECT * FROM askdb_test."Vendor" ORDER BY id"#)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], json!(1));
    assert_eq!(rows[0]["name"], json!("供应商"));
    assert_eq!(rows[0]["active"], json!(true));
    assert_eq!(
        rows[0]["external_id"],
        json!("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11")
    );
    assert!(rows[0]["created_at"].as_str().unwrap().starts_with("2024-03-01"));
    assert_eq!(rows[1]["created_at"], Value::Null);

    let rows = executor
        .execute(r#"SELECT amount, meta, COUNT(*) OVER () AS total FROM askdb_test."Invoice""#)
        .await
        .unwrap();
    assert_eq!(rows[0]["amount"], json!(1250.5));
    assert_eq!(rows[0]["meta"], json!({ "late": true }));
    assert_eq!(rows[0]["total"], json!(1));

    // Errors carry the server's message
    let err = executor
        .execute(r#"SELECT * FROM askdb_test."Vendors""#)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert_eq!(err.sql_state(), Some("42P01"));

    // Cleanup
    let _ = executor.execute("DROP SCHEMA askdb_test CASCADE").await;
    pool.close().await;
}
