//! Pooled SQLite connection

use di::inject;
use di::injectable;
use log::info;
use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::sync::RwLock;

const MAX_CONNECTIONS: u32 = 5;

/// Pool handed to every `DatabaseConnection` resolved through DI.
static INSTALLED_POOL: RwLock<Option<SqlitePool>> = RwLock::new(None);

pub struct DatabaseConnection {
    connection: SqlitePool,
}

#[injectable]
impl DatabaseConnection {
    #[inject]
    pub fn create() -> DatabaseConnection {
        let pool = INSTALLED_POOL
            .read()
            .ok()
            .and_then(|pool| pool.clone())
            .expect("a pool must be installed before resolving DatabaseConnection");

        DatabaseConnection { connection: pool }
    }
}

impl DatabaseConnection {
    pub fn from_pool(pool: SqlitePool) -> DatabaseConnection {
        DatabaseConnection { connection: pool }
    }

    /// Opens the pool for `database_url` and brings the schema up to date.
    ///
    /// A missing database file is created.
    pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        Ok(pool)
    }

    pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
        sqlx::migrate!().run(pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    /// Makes `pool` the one returned by [`DatabaseConnection::create`].
    pub fn install(pool: SqlitePool) {
        if let Ok(mut installed) = INSTALLED_POOL.write() {
            *installed = Some(pool);
        }
    }

    pub fn uninstall() {
        if let Ok(mut installed) = INSTALLED_POOL.write() {
            installed.take();
        }
    }
}

impl Deref for DatabaseConnection {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl DerefMut for DatabaseConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.connection
    }
}
