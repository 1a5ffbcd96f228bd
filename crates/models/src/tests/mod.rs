

use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Database-backed tests run only when a database is configured and not explicitly skipped.
pub(crate) fn db_tests_enabled() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

/// Connect and make sure the schema is current. Migrations run once per test process.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    MIGRATED
        .get_or_try_init(|| async {
            let db = crate::db::connect().await?;
            crate::db::run_migrations(&db).await?;
            db.close().await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    crate::db::connect().await
}
