use crate::db::{self, DbPool};
use crate::error::ServiceError;
use crate::models::{Ticket, User};
use crate::service::with_connection;

fn conflict_or_internal(err: anyhow::Error, what: &str) -> ServiceError {
    if db::is_unique_violation(&err) {
        ServiceError::Conflict(format!("{what} is already taken"))
    } else {
        ServiceError::Internal(err)
    }
}

pub async fn register_user(pool: &DbPool, username: &str, email: &str) -> Result<User, ServiceError> {
    let user = User::new(username, email)?;
    with_connection(pool, move |conn| {
        let stored = db::users::insert_user(conn, &user)
            .map_err(|e| conflict_or_internal(e, "username or email"))?;
        log::info!("Registered user {:?} ({:?})", stored.username, stored.id);
        Ok(stored)
    })
    .await
}

pub async fn get_user(pool: &DbPool, id: i32) -> Result<User, ServiceError> {
    with_connection(pool, move |conn| {
        db::users::get_user(conn, id)?.ok_or_else(|| ServiceError::not_found("user", id))
    })
    .await
}

pub async fn update_user(
    pool: &DbPool,
    id: i32,
    username: Option<String>,
    email: Option<String>,
) -> Result<User, ServiceError> {
    with_connection(pool, move |conn| {
        let current = db::users::get_user(conn, id)?.ok_or_else(|| ServiceError::not_found("user", id))?;
        let updated = current.with_profile(username.as_deref(), email.as_deref())?;
        db::users::update_user(conn, &updated).map_err(|e| conflict_or_internal(e, "username or email"))?;
        log::debug!("Updated user {id}");
        Ok(updated)
    })
    .await
}

pub async fn user_tickets(pool: &DbPool, id: i32) -> Result<Vec<Ticket>, ServiceError> {
    with_connection(pool, move |conn| {
        if db::users::get_user(conn, id)?.is_none() {
            return Err(ServiceError::not_found("user", id));
        }
        Ok(db::tickets::get_tickets_by_user(conn, id)?)
    })
    .await
}
