use serde::{Deserialize, Serialize};

use crate::game::GameType;

/// A player's pick, as the settlement engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i32,
    pub game_type: GameType,
    pub numbers: Vec<i32>,
}

/// A published draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: i32,
    pub game_type: GameType,
    pub numbers: Vec<i32>,
    /// Only `power_6_55` draws one.
    pub bonus_number: Option<i32>,
}

/// A prize tier of one game type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeCategory {
    pub id: i32,
    pub game_type: GameType,
    pub name: String,
    pub match_count: usize,
    pub include_bonus: bool,
    /// Fixed award in whole currency units.
    pub prize_amount: i64,
    /// Share of the prize pool, 0-100.
    pub prize_percentage: f64,
}

/// Outcome of one ticket against one drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingResult {
    pub ticket_id: i32,
    pub drawing_id: i32,
    /// Sorted ascending.
    pub matched_numbers: Vec<i32>,
    pub matched_bonus: bool,
    pub prize_category_id: Option<i32>,
    pub prize_amount: Option<i64>,
}

impl DrawingResult {
    pub fn is_win(&self) -> bool {
        self.prize_category_id.is_some()
    }

    pub fn match_count(&self) -> usize {
        self.matched_numbers.len()
    }
}
