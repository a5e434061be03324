use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::game::GameType;
use crate::model::{Drawing, DrawingResult, PrizeCategory, Ticket};
use crate::prize::precedence;
use crate::validate::{ValidationErrors, validate_drawing, validate_ticket};

/// Which input failed the internal re-validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Ticket,
    Drawing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettleError {
    #[error("ticket {ticket_id} is for {ticket}, drawing {drawing_id} is for {drawing}")]
    GameTypeMismatch {
        ticket_id: i32,
        drawing_id: i32,
        ticket: GameType,
        drawing: GameType,
    },
    #[error("{side} {id} was never validated: {errors}")]
    NotValidated {
        side: Side,
        id: i32,
        errors: ValidationErrors,
    },
}

/// Evaluate `ticket` against `drawing` and pick the prize category it earns.
///
/// `categories` may arrive in any order; they are ranked by [`precedence`] and
/// categories of other game types are skipped. A ticket that earns nothing gets
/// a result with no category and no amount.
pub fn settle(
    ticket: &Ticket,
    drawing: &Drawing,
    categories: &[PrizeCategory],
) -> Result<DrawingResult, SettleError> {
    if ticket.game_type != drawing.game_type {
        return Err(SettleError::GameTypeMismatch {
            ticket_id: ticket.id,
            drawing_id: drawing.id,
            ticket: ticket.game_type,
            drawing: drawing.game_type,
        });
    }

    validate_ticket(ticket.game_type, &ticket.numbers).map_err(|errors| {
        SettleError::NotValidated {
            side: Side::Ticket,
            id: ticket.id,
            errors,
        }
    })?;
    validate_drawing(drawing.game_type, &drawing.numbers, drawing.bonus_number).map_err(
        |errors| SettleError::NotValidated {
            side: Side::Drawing,
            id: drawing.id,
            errors,
        },
    )?;

    let picked: BTreeSet<i32> = ticket.numbers.iter().copied().collect();
    let matched_numbers: Vec<i32> = drawing
        .numbers
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .intersection(&picked)
        .copied()
        .collect();
    let matched_bonus = drawing
        .bonus_number
        .is_some_and(|bonus| picked.contains(&bonus));

    let category = select_category(
        drawing.game_type,
        matched_numbers.len(),
        matched_bonus,
        categories,
    );

    Ok(DrawingResult {
        ticket_id: ticket.id,
        drawing_id: drawing.id,
        matched_numbers,
        matched_bonus,
        prize_category_id: category.map(|c| c.id),
        prize_amount: category.map(|c| c.prize_amount),
    })
}

/// First category in precedence order whose exact match count and bonus condition hold.
pub fn select_category(
    game: GameType,
    match_count: usize,
    matched_bonus: bool,
    categories: &[PrizeCategory],
) -> Option<&PrizeCategory> {
    let mut ranked: Vec<&PrizeCategory> = categories
        .iter()
        .filter(|c| c.game_type == game)
        .collect();
    ranked.sort_by(|a, b| precedence(a, b));

    ranked
        .into_iter()
        .find(|c| c.match_count == match_count && (!c.include_bonus || matched_bonus))
}

/// Settle every ticket against the same drawing. One result per ticket, in input order.
pub fn settle_all(
    tickets: &[Ticket],
    drawing: &Drawing,
    categories: &[PrizeCategory],
) -> Vec<Result<DrawingResult, SettleError>> {
    tickets
        .iter()
        .map(|ticket| settle(ticket, drawing, categories))
        .collect()
}

/// Winner counts per category and the total fixed amount awarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrizeTally {
    pub settled: usize,
    pub winners: usize,
    /// category id -> number of winning tickets
    pub by_category: BTreeMap<i32, usize>,
    pub total_awarded: i64,
}

impl PrizeTally {
    pub fn record(&mut self, result: &DrawingResult) {
        self.settled += 1;
        if let Some(id) = result.prize_category_id {
            self.winners += 1;
            *self.by_category.entry(id).or_insert(0) += 1;
            self.total_awarded += result.prize_amount.unwrap_or(0);
        }
    }
}

impl<'a> FromIterator<&'a DrawingResult> for PrizeTally {
    fn from_iter<I: IntoIterator<Item = &'a DrawingResult>>(iter: I) -> Self {
        let mut tally = Self::default();
        for result in iter {
            tally.record(result);
        }
        tally
    }
}
