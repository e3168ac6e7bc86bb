use crate::error::{CmsError, Result};
use libsql::{Builder, Connection, Database};
use std::env;
use tracing::info;

/// Connection manager for the hosted libSQL backend.
pub struct DatabaseManager {
    db: Database,
}

impl DatabaseManager {
    /// Create a new database manager with a connection to the hosted backend
    pub async fn new() -> Result<Self> {
        let url = env::var("LIBSQL_URL").map_err(|_| CmsError::Database {
            message: "LIBSQL_URL environment variable not set".to_string(),
        })?;

        let auth_token = env::var("LIBSQL_AUTH_TOKEN").map_err(|_| CmsError::Database {
            message: "LIBSQL_AUTH_TOKEN environment variable not set".to_string(),
        })?;

        info!("Connecting to hosted database at {}", url);

        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| CmsError::Database {
                message: format!("Failed to connect to database: {e}"),
            })?;

        Ok(Self { db })
    }

    /// Get a connection to the database
    pub fn get_connection(&self) -> Result<Connection> {
        self.db.connect().map_err(|e| CmsError::Database {
            message: format!("Failed to get database connection: {e}"),
        })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        let conn = self.get_connection()?;

        let migration_sql = include_str!("../migrations/001_create_cms_tables.sql");

        conn.execute_batch(migration_sql)
            .await
            .map_err(|e| CmsError::Database {
                message: format!("Failed to run migrations: {e}"),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}
