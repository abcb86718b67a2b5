use sqlx::PgPool;

/// Connect, migrate, and confirm every table is in place.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    gigbook_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "user_sessions",
        "artists",
        "organizers",
        "events",
        "event_applications",
        "bookings",
        "disputes",
        "reviews",
        "activity_log",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The shared trigger keeps `updated_at` moving on every UPDATE.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let (id, created): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ('Trigger', 'trigger@test.com', 'x', 'artist')
         RETURNING id, updated_at",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let (updated,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("UPDATE users SET name = 'Renamed' WHERE id = $1 RETURNING updated_at")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(updated >= created);
}
