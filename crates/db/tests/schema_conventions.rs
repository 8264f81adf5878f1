use sqlx::PgPool;

/// Every `id` column is a UUID except `sessions.id`, which holds a SHA-256 hex digest.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_correct_type(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        let expected = if table == "sessions" { "text" } else { "uuid" };
        assert_eq!(
            data_type, expected,
            "Table {table}.id should be {expected}, got {data_type}"
        );
    }
}

/// Every table (except _sqlx_migrations) must have created_at and updated_at as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// Every table with updated_at keeps it current through a trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_triggers_exist(pool: PgPool) {
    let missing: Vec<(String,)> = sqlx::query_as(
        "SELECT c.table_name
         FROM information_schema.columns c
         WHERE c.table_schema = 'public'
           AND c.column_name = 'updated_at'
           AND NOT EXISTS (
               SELECT 1 FROM information_schema.triggers t
               WHERE t.event_object_table = c.table_name
                 AND t.trigger_name = 'trg_' || c.table_name || '_updated_at'
           )",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(missing.is_empty(), "Tables without updated_at trigger: {missing:?}");
}
