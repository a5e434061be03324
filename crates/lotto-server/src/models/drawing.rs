use std::str::FromStr as _;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use lotto_core::{GameType, ValidationError, ValidationErrors, validate_drawing};
use serde::{Deserialize, Serialize};

/// Official draw. Immutable once stored; exactly one per (game type, draw time).
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::models::schema::drawings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Drawing {
    pub id: Option<i32>,
    pub game_type: String,
    pub number1: i32,
    pub number2: i32,
    pub number3: i32,
    pub number4: i32,
    pub number5: i32,
    pub number6: i32,
    pub bonus_number: Option<i32>,
    pub draw_time: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DrawingView {
    pub id: Option<i32>,
    pub game_type: String,
    pub numbers: Vec<i32>,
    pub bonus_number: Option<i32>,
    pub draw_time: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl Drawing {
    pub fn new(
        game: GameType,
        numbers: &[i32],
        bonus_number: Option<i32>,
        draw_time: NaiveDateTime,
    ) -> Result<Self, ValidationErrors> {
        validate_drawing(game, numbers, bonus_number)?;

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
            game_type: game.id().to_owned(),
            number1,
            number2,
            number3,
            number4,
            number5,
            number6,
            bonus_number,
            draw_time,
            created_at: chrono::Utc::now().naive_utc(),
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

    pub fn to_core(&self) -> anyhow::Result<lotto_core::Drawing> {
        let id = self
            .id
            .ok_or_else(|| anyhow::anyhow!("Drawing has not been stored yet"))?;
        Ok(lotto_core::Drawing {
            id,
            game_type: self.game()?,
            numbers: self.numbers(),
            bonus_number: self.bonus_number,
        })
    }

    /// Last instant a ticket may have been bought to count for this drawing.
    /// The numbers are public from `created_at` on.
    pub fn closes_at(&self) -> NaiveDateTime {
        self.draw_time.min(self.created_at)
    }

    pub fn view(&self) -> DrawingView {
        DrawingView {
            id: self.id,
            game_type: self.game_type.clone(),
            numbers: self.numbers(),
            bonus_number: self.bonus_number,
            draw_time: self.draw_time,
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Display for Drawing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {:02} {:02} {:02} {:02} {:02} {:02}",
            self.game_type,
            self.draw_time.format("%Y-%m-%d %H:%M:%S"),
            self.number1,
            self.number2,
            self.number3,
            self.number4,
            self.number5,
            self.number6
        )?;
        if let Some(bonus) = self.bonus_number {
            write!(f, " + {bonus:02}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn draw_time() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-01-03 18:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn power_drawing_requires_bonus() {
        let err = Drawing::new(GameType::Power655, &[1, 2, 3, 4, 5, 6], None, draw_time()).unwrap_err();
        assert_eq!(
            err.0,
            vec![ValidationError::BonusMissing {
                game: GameType::Power655
            }]
        );
    }

    #[test]
    fn display_includes_bonus() -> anyhow::Result<()> {
        let drawing = Drawing::new(GameType::Power655, &[9, 3, 1, 40, 22, 15], Some(7), draw_time())?;
        assert_eq!(
            drawing.to_string(),
            "power_6_55 2025-01-03 18:00:00 01 03 09 15 22 40 + 07"
        );
        assert_eq!(drawing.view().numbers, vec![1, 3, 9, 15, 22, 40]);
        Ok(())
    }
}
