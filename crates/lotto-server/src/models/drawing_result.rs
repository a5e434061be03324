use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored outcome of one ticket against one drawing. Written once, never updated.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::models::schema::drawing_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DrawingResult {
    pub id: Option<i32>,
    pub ticket_id: i32,
    pub drawing_id: i32,
    /// JSON array, sorted ascending
    pub matched_numbers: String,
    pub matched_bonus: bool,
    pub prize_category_id: Option<i32>,
    pub prize_amount: Option<i64>,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DrawingResultView {
    pub id: Option<i32>,
    pub ticket_id: i32,
    pub drawing_id: i32,
    pub matched_numbers: Vec<i32>,
    pub matched_bonus: bool,
    pub prize_category_id: Option<i32>,
    pub prize_amount: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl DrawingResult {
    pub fn from_core(result: &lotto_core::DrawingResult) -> anyhow::Result<Self> {
        if result.prize_category_id.is_some() && !result.prize_amount.is_some_and(|a| a >= 0) {
            anyhow::bail!(
                "Result for ticket {} has a prize category but amount {:?}",
                result.ticket_id,
                result.prize_amount
            );
        }

        Ok(Self {
            id: None,
            ticket_id: result.ticket_id,
            drawing_id: result.drawing_id,
            matched_numbers: serde_json::to_string(&result.matched_numbers)?,
            matched_bonus: result.matched_bonus,
            prize_category_id: result.prize_category_id,
            prize_amount: result.prize_amount,
            created_at: chrono::Utc::now().naive_utc(),
        })
    }

    pub fn matched_numbers(&self) -> anyhow::Result<Vec<i32>> {
        serde_json::from_str(&self.matched_numbers).map_err(|e| {
            anyhow::anyhow!(
                "Corrupt matched numbers {:?} on result {:?}: {e}",
                self.matched_numbers,
                self.id
            )
        })
    }

    pub fn view(&self) -> anyhow::Result<DrawingResultView> {
        Ok(DrawingResultView {
            id: self.id,
            ticket_id: self.ticket_id,
            drawing_id: self.drawing_id,
            matched_numbers: self.matched_numbers()?,
            matched_bonus: self.matched_bonus,
            prize_category_id: self.prize_category_id,
            prize_amount: self.prize_amount,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_result(prize_category_id: Option<i32>, prize_amount: Option<i64>) -> lotto_core::DrawingResult {
        lotto_core::DrawingResult {
            ticket_id: 3,
            drawing_id: 8,
            matched_numbers: vec![2, 9, 17],
            matched_bonus: false,
            prize_category_id,
            prize_amount,
        }
    }

    #[test]
    fn stores_matched_numbers_as_json() -> anyhow::Result<()> {
        let record = DrawingResult::from_core(&core_result(Some(4), Some(30_000)))?;
        assert_eq!(record.matched_numbers, "[2,9,17]");
        assert_eq!(record.view()?.matched_numbers, vec![2, 9, 17]);
        Ok(())
    }

    #[test]
    fn winning_result_needs_an_amount() {
        assert!(DrawingResult::from_core(&core_result(Some(4), None)).is_err());
        assert!(DrawingResult::from_core(&core_result(Some(4), Some(-5))).is_err());
        assert!(DrawingResult::from_core(&core_result(None, None)).is_ok());
    }
}
