use diesel::sqlite::SqliteConnection;

use crate::db::{self, DbPool};
use crate::error::ServiceError;

pub mod drawing;
pub mod prize;
pub mod settlement;
pub mod ticket;
pub mod user;

pub use drawing::{PublishedDrawing, drawing_results, latest_drawing, publish_drawing, recent_drawings};
pub use prize::{NewCategory, add_category, ensure_default_categories, list_categories};
pub use settlement::{CategoryWinners, SettlementReport, settle_drawing};
pub use ticket::{attach_ticket, buy_ticket, get_ticket, ticket_result};
pub use user::{get_user, register_user, update_user, user_tickets};

/// Run `f` on a pooled connection off the async runtime.
pub(crate) async fn with_connection<T, F>(pool: &DbPool, f: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, ServiceError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = db::get_connection(&pool)?;
        f(&mut conn)
    })
    .await
    .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Blocking database task failed: {e}")))?
}

pub async fn check_database(pool: &DbPool) -> Result<(), ServiceError> {
    with_connection(pool, |conn| db::ping(conn).map_err(ServiceError::from)).await
}
