use diesel::sqlite::SqliteConnection;
use lotto_core::{GameType, PrizeTally, settle};
use serde::Serialize;

use crate::db::{self, DbPool};
use crate::error::ServiceError;
use crate::models::{DrawingResult, PrizeCategory, Ticket};
use crate::service::with_connection;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryWinners {
    pub category_id: i32,
    pub name: String,
    pub winners: usize,
}

/// Outcome of one settlement run over a drawing.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SettlementReport {
    pub drawing_id: i32,
    pub game_type: GameType,
    /// Results written by this run.
    pub settled: usize,
    /// Tickets that already had a result.
    pub already_settled: usize,
    pub failed: usize,
    pub winners: usize,
    pub by_category: Vec<CategoryWinners>,
    pub total_awarded: i64,
}

enum Outcome {
    Settled(lotto_core::DrawingResult),
    AlreadySettled,
}

/// Settle every ticket attached to the drawing.
///
/// Each ticket is written in its own transaction and only when it has no result yet,
/// so running this again (or after a crash) never awards a ticket twice.
pub async fn settle_drawing(
    pool: &DbPool,
    game: GameType,
    drawing_id: i32,
) -> Result<SettlementReport, ServiceError> {
    with_connection(pool, move |conn| {
        let drawing = db::drawings::get_drawing(conn, drawing_id)?
            .ok_or_else(|| ServiceError::not_found("drawing", drawing_id))?;
        let drawing_game = drawing.game()?;
        if drawing_game != game {
            return Err(ServiceError::Mismatch(format!(
                "drawing {drawing_id} is for {drawing_game}, not {game}"
            )));
        }
        let core_drawing = drawing.to_core()?;

        let stored_categories = db::prize_categories::get_categories(conn, game)?;
        let categories = stored_categories
            .iter()
            .map(PrizeCategory::to_core)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let tickets = db::tickets::get_tickets_by_drawing(conn, drawing_id)?;
        log::info!(
            "Settling drawing {drawing} against {} tickets and {} categories",
            tickets.len(),
            categories.len()
        );

        let mut tally = PrizeTally::default();
        let mut already_settled = 0;
        let mut failed = 0;

        for ticket in &tickets {
            match settle_ticket(conn, ticket, &core_drawing, &categories) {
                Ok(Outcome::Settled(result)) => tally.record(&result),
                Ok(Outcome::AlreadySettled) => already_settled += 1,
                Err(e) => {
                    log::error!("Failed to settle ticket {ticket} in drawing {drawing_id}: {e:#}");
                    failed += 1;
                }
            }
        }

        let by_category = stored_categories
            .iter()
            .filter_map(|category| {
                let id = category.id?;
                let winners = tally.by_category.get(&id).copied().unwrap_or(0);
                Some(CategoryWinners {
                    category_id: id,
                    name: category.name.clone(),
                    winners,
                })
            })
            .collect();

        let report = SettlementReport {
            drawing_id,
            game_type: game,
            settled: tally.settled,
            already_settled,
            failed,
            winners: tally.winners,
            by_category,
            total_awarded: tally.total_awarded,
        };
        log::info!(
            "Drawing {drawing_id} settled: {} new, {} already settled, {} failed, {} winners, {} awarded",
            report.settled,
            report.already_settled,
            report.failed,
            report.winners,
            report.total_awarded
        );
        Ok(report)
    })
    .await
}

fn settle_ticket(
    conn: &mut SqliteConnection,
    ticket: &Ticket,
    drawing: &lotto_core::Drawing,
    categories: &[lotto_core::PrizeCategory],
) -> anyhow::Result<Outcome> {
    let core_ticket = ticket.to_core()?;
    if db::results::get_result(conn, core_ticket.id, drawing.id)?.is_some() {
        return Ok(Outcome::AlreadySettled);
    }

    let result = settle(&core_ticket, drawing, categories)?;
    let record = DrawingResult::from_core(&result)?;

    conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        if !db::results::insert_result_if_absent(conn, &record)? {
            return Ok(Outcome::AlreadySettled);
        }
        db::tickets::set_prize_category(conn, core_ticket.id, result.prize_category_id)?;
        log::debug!(
            "Ticket {} matched {:?} (bonus: {}) -> {:?}",
            core_ticket.id,
            result.matched_numbers,
            result.matched_bonus,
            result.prize_category_id
        );
        Ok(Outcome::Settled(result.clone()))
    })
}
