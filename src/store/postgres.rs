//! PostgreSQL-backed directory store and database bootstrap.

use super::DirectoryStore;
use crate::error::{AppError, ConfigError};
use crate::model::{Directory, DirectoryPatch, NewDirectory};
use async_trait::async_trait;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

pub const DEFAULT_TABLE: &str = "directories";

/// Quote identifier for PostgreSQL (table name comes from config only).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Clone)]
pub struct PgDirectoryStore {
    pool: PgPool,
    table: String,
}

impl PgDirectoryStore {
    pub fn with_table(pool: PgPool, table: &str) -> Self {
        PgDirectoryStore {
            pool,
            table: quoted(table),
        }
    }

    /// Create the directories table if it does not exist.
    pub async fn ensure_table(&self) -> Result<(), AppError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id BIGSERIAL PRIMARY KEY, \
             name VARCHAR(255) NOT NULL, \
             emails TEXT[] NOT NULL)",
            self.table
        );
        tracing::debug!(sql = %ddl, "ensure table");
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    async fn create(&self, new: NewDirectory) -> Result<Directory, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, emails) VALUES ($1, $2) RETURNING id, name, emails",
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Directory>(&sql)
            .bind(&new.name)
            .bind(&new.emails)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<Directory>, AppError> {
        let sql = format!("SELECT id, name, emails FROM {} WHERE id = $1", self.table);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Directory>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        tracing::debug!(sql = %sql, "query");
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Directory>, AppError> {
        let sql = format!(
            "SELECT id, name, emails FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            self.table
        );
        tracing::debug!(sql = %sql, offset, limit, "query");
        let rows = sqlx::query_as::<_, Directory>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, patch: DirectoryPatch) -> Result<Option<Directory>, AppError> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        // Single statement: the row lock taken by UPDATE covers both the existence check and the write.
        let sql = format!(
            "UPDATE {} SET name = COALESCE($2, name), emails = COALESCE($3, emails) \
             WHERE id = $1 RETURNING id, name, emails",
            self.table
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Directory>(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.emails)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING id", self.table);
        tracing::debug!(sql = %sql, id, "query");
        let row: Option<(i64,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database named in `database_url` exists. Connects to the `postgres` database on the same
/// server and runs CREATE DATABASE if needed.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| ConfigError::Invalid {
        key: "DATABASE_URL",
        message: e.to_string(),
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let invalid = |message: &str| ConfigError::Invalid {
        key: "DATABASE_URL",
        message: message.to_string(),
    };
    let scheme_end = url.find("://").ok_or_else(|| invalid("missing scheme"))? + 3;
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| invalid("no database path"))?;
    let db_name = url[path_start..].split('?').next().unwrap_or("").trim();
    let admin_url = format!("{}postgres", &url[..path_start]);
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/dirs?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(db, "dirs");
    }

    #[test]
    fn rejects_url_without_path() {
        assert!(parse_db_name_from_url("postgres://localhost").is_err());
        assert!(parse_db_name_from_url("localhost/dirs").is_err());
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quoted("directories"), "\"directories\"");
        assert_eq!(quoted("a\"b"), "\"a\"\"b\"");
    }
}
