use std::str::FromStr as _;

use diesel::prelude::*;
use lotto_core::GameType;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::models::schema::prize_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PrizeCategory {
    pub id: Option<i32>,
    pub game_type: String,
    pub name: String,
    pub match_count: i32,
    pub include_bonus: bool,
    pub prize_amount: i64,
    pub prize_percentage: f64,
}

impl PrizeCategory {
    pub fn from_core(category: &lotto_core::PrizeCategory) -> anyhow::Result<Self> {
        Ok(Self {
            id: None,
            game_type: category.game_type.id().to_owned(),
            name: category.name.clone(),
            match_count: i32::try_from(category.match_count)?,
            include_bonus: category.include_bonus,
            prize_amount: category.prize_amount,
            prize_percentage: category.prize_percentage,
        })
    }

    /// Stored categories get their real id; unsaved ones get 0.
    pub fn to_core(&self) -> anyhow::Result<lotto_core::PrizeCategory> {
        Ok(lotto_core::PrizeCategory {
            id: self.id.unwrap_or_default(),
            game_type: GameType::from_str(&self.game_type)
                .map_err(|e| anyhow::anyhow!("Unknown game type {:?}: {e}", self.game_type))?,
            name: self.name.clone(),
            match_count: usize::try_from(self.match_count)
                .map_err(|e| anyhow::anyhow!("Invalid match count {}: {e}", self.match_count))?,
            include_bonus: self.include_bonus,
            prize_amount: self.prize_amount,
            prize_percentage: self.prize_percentage,
        })
    }
}
