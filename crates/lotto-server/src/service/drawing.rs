use chrono::NaiveDateTime;
use lotto_core::{DrawGenerator, GameType};
use serde::Serialize;

use crate::db::{self, DbPool};
use crate::error::ServiceError;
use crate::models::{Drawing, DrawingResult, DrawingView};
use crate::service::with_connection;

pub const DEFAULT_DRAWS_LIMIT: i64 = 10;
pub const MAX_DRAWS_LIMIT: i64 = 100;

#[derive(Serialize, Debug, Clone)]
pub struct PublishedDrawing {
    pub drawing: DrawingView,
    /// Pending tickets of the game attached to this drawing.
    pub attached_tickets: usize,
}

/// Publish the official drawing of `game` at `draw_time`.
///
/// Without `numbers` the draw generator picks the full set, bonus included.
pub async fn publish_drawing(
    pool: &DbPool,
    game: GameType,
    draw_time: NaiveDateTime,
    numbers: Option<Vec<i32>>,
    bonus_number: Option<i32>,
) -> Result<PublishedDrawing, ServiceError> {
    let (numbers, bonus_number) = match numbers {
        Some(numbers) => (numbers, bonus_number),
        None if bonus_number.is_some() => {
            return Err(ServiceError::invalid(
                "bonus_number",
                "a bonus number needs the main numbers as well",
            ));
        }
        None => {
            let drawn = DrawGenerator::from_entropy().draw(game);
            log::debug!("Generated {game} numbers {:?} + {:?}", drawn.numbers, drawn.bonus_number);
            (drawn.numbers, drawn.bonus_number)
        }
    };
    let drawing = Drawing::new(game, &numbers, bonus_number, draw_time)?;

    with_connection(pool, move |conn| {
        let outcome = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
            let stored = db::drawings::insert_drawing(conn, &drawing)?;
            let drawing_id = stored
                .id
                .ok_or_else(|| anyhow::anyhow!("Inserted drawing has no id"))?;
            let attached = db::tickets::attach_pending(conn, game, draw_time, drawing_id)?;
            Ok((stored, attached))
        });

        let (stored, attached_tickets) = outcome.map_err(|e| {
            if db::is_unique_violation(&e) {
                ServiceError::Conflict(format!(
                    "a {game} drawing at {draw_time} already exists"
                ))
            } else {
                ServiceError::Internal(e)
            }
        })?;

        log::info!("Published drawing {stored} with {attached_tickets} pending tickets");
        Ok(PublishedDrawing {
            drawing: stored.view(),
            attached_tickets,
        })
    })
    .await
}

pub async fn latest_drawing(pool: &DbPool, game: GameType) -> Result<Drawing, ServiceError> {
    with_connection(pool, move |conn| {
        db::drawings::get_latest_drawing(conn, game)?
            .ok_or_else(|| ServiceError::NotFound(format!("no {game} drawing has been published")))
    })
    .await
}

/// Newest first; `limit` defaults to 10 and is clamped to 1..=100.
pub async fn recent_drawings(
    pool: &DbPool,
    game: GameType,
    limit: Option<i64>,
) -> Result<Vec<Drawing>, ServiceError> {
    let limit = limit.unwrap_or(DEFAULT_DRAWS_LIMIT).clamp(1, MAX_DRAWS_LIMIT);
    with_connection(pool, move |conn| {
        Ok(db::drawings::get_recent_drawings(conn, game, limit)?)
    })
    .await
}

pub async fn drawing_results(pool: &DbPool, drawing_id: i32) -> Result<Vec<DrawingResult>, ServiceError> {
    with_connection(pool, move |conn| {
        if db::drawings::get_drawing(conn, drawing_id)?.is_none() {
            return Err(ServiceError::not_found("drawing", drawing_id));
        }
        Ok(db::results::get_results_by_drawing(conn, drawing_id)?)
    })
    .await
}
