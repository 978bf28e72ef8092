use sqlx::PgPool;

/// Tables whose rows are never updated in place, so they carry no `updated_at`.
const APPEND_ONLY: &[&str] = &["activity_log", "votes"];

async fn public_tables(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT table_name::text
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn column_type(pool: &PgPool, table: &str, column: &str) -> Option<String> {
    sqlx::query_scalar(
        "SELECT data_type::text
         FROM information_schema.columns
         WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2",
    )
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    for table in public_tables(&pool).await {
        let data_type = column_type(&pool, &table, "id").await;
        assert_eq!(data_type.as_deref(), Some("bigint"), "{table}.id");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_timestamps_are_timestamptz(pool: PgPool) {
    for table in public_tables(&pool).await {
        let created = column_type(&pool, &table, "created_at").await;
        assert_eq!(
            created.as_deref(),
            Some("timestamp with time zone"),
            "{table}.created_at"
        );

        let updated = column_type(&pool, &table, "updated_at").await;
        if APPEND_ONLY.contains(&table.as_str()) {
            assert_eq!(updated, None, "{table} should not carry updated_at");
        } else {
            assert_eq!(
                updated.as_deref(),
                Some("timestamp with time zone"),
                "{table}.updated_at"
            );
        }
    }
}

/// TEXT everywhere; no length-limited varchar columns.
#[sqlx::test(migrations = "./migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let offenders: Vec<String> = sqlx::query_scalar(
        "SELECT (table_name || '.' || column_name)::text
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND table_name != '_sqlx_migrations'
           AND data_type = 'character varying'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(offenders.is_empty(), "varchar columns: {offenders:?}");
}
