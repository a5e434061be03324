use chrono::NaiveDateTime;
use diesel::prelude::*;
use lotto_core::GameType;

use crate::db::{self, DbPool};
use crate::error::ServiceError;
use crate::models::{Drawing, DrawingResult, Ticket};
use crate::service::with_connection;

/// Check that `drawing_id` still takes a ticket of `game` bought at `bought_at`.
///
/// A drawing closes when its numbers are published or its draw time passes,
/// whichever comes first, and stays closed once any result exists.
fn open_drawing(
    conn: &mut SqliteConnection,
    game: GameType,
    drawing_id: i32,
    bought_at: NaiveDateTime,
) -> Result<Drawing, ServiceError> {
    let drawing = db::drawings::get_drawing(conn, drawing_id)?
        .ok_or_else(|| ServiceError::not_found("drawing", drawing_id))?;

    let drawing_game = drawing.game()?;
    if drawing_game != game {
        return Err(ServiceError::Mismatch(format!(
            "drawing {drawing_id} is for {drawing_game}, not {game}"
        )));
    }
    if bought_at > drawing.closes_at() {
        return Err(ServiceError::Conflict(format!(
            "drawing {drawing_id} closed at {}",
            drawing.closes_at()
        )));
    }
    if db::results::has_results(conn, drawing_id)? {
        return Err(ServiceError::Conflict(format!(
            "drawing {drawing_id} has already been settled"
        )));
    }
    Ok(drawing)
}

pub async fn buy_ticket(
    pool: &DbPool,
    game: GameType,
    user_id: i32,
    numbers: Vec<i32>,
    drawing_id: Option<i32>,
) -> Result<Ticket, ServiceError> {
    let ticket = Ticket::new(user_id, game, &numbers, drawing_id)?;

    with_connection(pool, move |conn| {
        conn.immediate_transaction::<_, ServiceError, _>(|conn| {
            if db::users::get_user(conn, user_id)?.is_none() {
                return Err(ServiceError::not_found("user", user_id));
            }
            if let Some(drawing_id) = drawing_id {
                open_drawing(conn, game, drawing_id, ticket.created_at)?;
            }

            let stored = db::tickets::insert_ticket(conn, &ticket)?;
            log::info!("User {user_id} bought ticket {stored}");
            Ok(stored)
        })
    })
    .await
}

pub async fn get_ticket(pool: &DbPool, id: i32) -> Result<Ticket, ServiceError> {
    with_connection(pool, move |conn| {
        db::tickets::get_ticket(conn, id)?.ok_or_else(|| ServiceError::not_found("ticket", id))
    })
    .await
}

pub async fn attach_ticket(pool: &DbPool, ticket_id: i32, drawing_id: i32) -> Result<Ticket, ServiceError> {
    with_connection(pool, move |conn| {
        conn.immediate_transaction::<_, ServiceError, _>(|conn| {
            let ticket = db::tickets::get_ticket(conn, ticket_id)?
                .ok_or_else(|| ServiceError::not_found("ticket", ticket_id))?;
            if let Some(current) = ticket.drawing_id {
                return Err(ServiceError::Conflict(format!(
                    "ticket {ticket_id} is already attached to drawing {current}"
                )));
            }

            open_drawing(conn, ticket.game()?, drawing_id, ticket.created_at)?;

            if !db::tickets::attach_drawing(conn, ticket_id, drawing_id)? {
                return Err(ServiceError::Conflict(format!(
                    "ticket {ticket_id} was attached concurrently"
                )));
            }
            log::debug!("Attached ticket {ticket_id} to drawing {drawing_id}");
            Ok(Ticket {
                drawing_id: Some(drawing_id),
                ..ticket
            })
        })
    })
    .await
}

/// The settlement result of a ticket; not found until its drawing has been settled.
pub async fn ticket_result(pool: &DbPool, ticket_id: i32) -> Result<DrawingResult, ServiceError> {
    with_connection(pool, move |conn| {
        let ticket = db::tickets::get_ticket(conn, ticket_id)?
            .ok_or_else(|| ServiceError::not_found("ticket", ticket_id))?;
        let drawing_id = ticket.drawing_id.ok_or_else(|| {
            ServiceError::NotFound(format!("ticket {ticket_id} is not attached to a drawing"))
        })?;

        db::results::get_result(conn, ticket_id, drawing_id)?.ok_or_else(|| {
            ServiceError::NotFound(format!("ticket {ticket_id} has not been settled yet"))
        })
    })
    .await
}
