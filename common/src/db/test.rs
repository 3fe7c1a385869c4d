use crate::db::Database;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tracing::instrument;

/// Test context providing a freshly migrated database per test.
///
/// The database lives in a tempdir so tests stay hermetic and can run in
/// parallel.
pub struct EspalierContext {
    pub db: Database,
    #[allow(dead_code)]
    tempdir: TempDir,
}

impl AsyncTestContext for EspalierContext {
    #[allow(clippy::expect_used)]
    #[instrument]
    async fn setup() -> EspalierContext {
        let tempdir = tempfile::tempdir().expect("failed to create tempdir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            tempdir.path().join("espalier.db").display()
        );

        let db = Database::new(&crate::config::Database::new(url))
            .await
            .expect("failed to connect to the test database");
        db.migrate()
            .await
            .expect("failed to run database migration");

        EspalierContext { db, tempdir }
    }

    async fn teardown(self) {
        // tempdir cleanup takes the database with it
    }
}
