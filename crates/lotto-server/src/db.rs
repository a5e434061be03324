use diesel::connection::SimpleConnection as _;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

use crate::models::schema::CREATE_TABLES;

pub mod drawings;
pub mod prize_categories;
pub mod results;
pub mod tickets;
pub mod users;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct SqliteConnectionCustomizer;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        // WAL for concurrent readers; in-memory databases silently keep their own mode
        conn.batch_execute(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 30000;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(diesel::r2d2::Error::QueryError)?;

        conn.batch_execute(CREATE_TABLES)
            .map_err(diesel::r2d2::Error::QueryError)?;

        Ok(())
    }
}

/// Build the connection pool. Every connection gets the pragmas and the schema on acquire.
///
/// `:memory:` databases are private to one connection, so callers using one should
/// pass `max_size = 1`.
pub fn build_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(std::time::Duration::from_secs(30))
        .connection_customizer(Box::new(SqliteConnectionCustomizer))
        .build(manager)
        .map_err(|e| {
            let err_message = format!("Error connecting to {database_url}: {e}");
            log::error!("{err_message}");
            anyhow::anyhow!("{err_message}")
        })
}

pub fn get_connection(pool: &DbPool) -> anyhow::Result<DbConnection> {
    pool.get()
        .map_err(|e| anyhow::anyhow!("Failed to get DB connection: {e}"))
}

pub fn ping(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    diesel::sql_query("SELECT 1")
        .execute(conn)
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("Database ping failed: {e}"))
}

/// Row id of the last successful insert on this connection.
pub(crate) fn last_insert_id(conn: &mut SqliteConnection) -> anyhow::Result<i32> {
    diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>(
        "last_insert_rowid()",
    ))
    .get_result::<i32>(conn)
    .map_err(|e| anyhow::anyhow!("Error reading last insert id: {e}"))
}

/// True when anywhere in the chain sits a diesel unique-constraint failure.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<DieselError>(),
            Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        )
    })
}

#[cfg(test)]
pub(crate) fn test_pool() -> DbPool {
    build_pool(":memory:", 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_creates_schema() -> anyhow::Result<()> {
        let pool = test_pool();
        let mut conn = get_connection(&pool)?;
        ping(&mut conn)?;

        use crate::models::schema::users;
        let count: i64 = users::table.count().get_result(&mut conn)?;
        assert_eq!(count, 0);
        Ok(())
    }

    #[test]
    fn detects_unique_violation() -> anyhow::Result<()> {
        let pool = test_pool();
        let mut conn = get_connection(&pool)?;
        let user = crate::models::User::new("dave", "dave@example.com").unwrap();
        users::insert_user(&mut conn, &user)?;

        let err = users::insert_user(&mut conn, &user).unwrap_err();
        assert!(is_unique_violation(&err));
        assert!(!is_unique_violation(&anyhow::anyhow!("plain")));
        Ok(())
    }
}
