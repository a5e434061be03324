use std::str::FromStr as _;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use lotto_core::{GameType, ValidationError, ValidationErrors, validate_ticket};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Ticket record for both querying and inserting.
/// The id field is None for new records and Some(value) for stored ones.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::models::schema::tickets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Ticket {
    pub id: Option<i32>,
    pub user_id: i32,
    pub game_type: String,
    pub number1: i32,
    pub number2: i32,
    pub number3: i32,
    pub number4: i32,
    pub number5: i32,
    pub number6: i32,
    pub created_at: NaiveDateTime,
    pub drawing_id: Option<i32>,
    pub prize_category_id: Option<i32>,
}

/// JSON shape of a ticket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    pub id: Option<i32>,
    pub user_id: i32,
    pub game_type: String,
    pub numbers: Vec<i32>,
    pub created_at: NaiveDateTime,
    pub drawing_id: Option<i32>,
    pub prize_category_id: Option<i32>,
}

impl Ticket {
    /// Validate the pick and build a new ticket. Numbers are stored sorted.
    pub fn new(
        user_id: i32,
        game: GameType,
        numbers: &[i32],
        drawing_id: Option<i32>,
    ) -> Result<Self, ValidationErrors> {
        validate_ticket(game, numbers)?;

        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        let [number1, number2, number3, number4, number5, number6]: [i32; 6] =
            sorted.try_into().map_err(|rest: Vec<i32>| {
                ValidationErrors(vec![ValidationError::WrongCount {
                    expected: 6,
                    actual: rest.len(),
                }])
            })?;

        Ok(Self {
            id: None,
            user_id,
            game_type: game.id().to_owned(),
            number1,
            number2,
            number3,
            number4,
            number5,
            number6,
            created_at: chrono::Utc::now().naive_utc(),
            drawing_id,
            prize_category_id: None,
        })
    }

    pub fn numbers(&self) -> Vec<i32> {
        vec![
            self.number1,
            self.number2,
            self.number3,
            self.number4,
            self.number5,
            self.number6,
        ]
    }

    pub fn game(&self) -> anyhow::Result<GameType> {
        GameType::from_str(&self.game_type)
            .map_err(|e| anyhow::anyhow!("Unknown game type {:?}: {e}", self.game_type))
    }

    /// Settlement input. Only stored tickets have one.
    pub fn to_core(&self) -> anyhow::Result<lotto_core::Ticket> {
        let id = self
            .id
            .ok_or_else(|| anyhow::anyhow!("Ticket has not been stored yet"))?;
        Ok(lotto_core::Ticket {
            id,
            game_type: self.game()?,
            numbers: self.numbers(),
        })
    }

    pub fn view(&self) -> TicketView {
        TicketView {
            id: self.id,
            user_id: self.user_id,
            game_type: self.game_type.clone(),
            numbers: self.numbers(),
            created_at: self.created_at,
            drawing_id: self.drawing_id,
            prize_category_id: self.prize_category_id,
        }
    }

    pub fn format_numbers(&self) -> String {
        format!(
            "{:02} {:02} {:02} {:02} {:02} {:02}",
            self.number1, self.number2, self.number3, self.number4, self.number5, self.number6
        )
    }
}

impl Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} [{}]",
            self.id.map_or_else(|| "-".to_owned(), |id| id.to_string()),
            self.game_type,
            self.format_numbers()
        )
    }
}
