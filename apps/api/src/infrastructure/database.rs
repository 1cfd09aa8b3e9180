use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Owned handle to the PostgreSQL pool
///
/// Opened once at startup and passed down explicitly; every repository call
/// checks a connection out of the pool for the duration of one statement.
/// Call [`Database::close`] on shutdown.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects to `database_url` with at most `max_connections` connections
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the embedded migrations, creating `users` and `incidents` if absent
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Waits for checked-out connections to be returned, then closes the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
