use lotto_core::{GameType, check_tiers, default_categories};
use strum::IntoEnumIterator as _;

use crate::db::{self, DbPool};
use crate::error::ServiceError;
use crate::models::PrizeCategory;
use crate::service::with_connection;

/// A prize tier to add to a game's table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub match_count: i32,
    pub include_bonus: bool,
    pub prize_amount: i64,
    pub prize_percentage: f64,
}

/// Seed the built-in prize table of every game that has none yet.
pub async fn ensure_default_categories(pool: &DbPool) -> Result<usize, ServiceError> {
    with_connection(pool, |conn| {
        let mut seeded = 0;
        for game in GameType::iter() {
            if db::prize_categories::count_categories(conn, game)? > 0 {
                continue;
            }
            conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
                for category in default_categories(game) {
                    db::prize_categories::insert_category(conn, &PrizeCategory::from_core(&category)?)?;
                }
                Ok(())
            })?;
            log::info!("Seeded default {game} prize categories");
            seeded += 1;
        }
        Ok(seeded)
    })
    .await
}

/// The game's categories in precedence order.
pub async fn list_categories(pool: &DbPool, game: GameType) -> Result<Vec<PrizeCategory>, ServiceError> {
    with_connection(pool, move |conn| {
        Ok(db::prize_categories::get_categories(conn, game)?)
    })
    .await
}

/// Add a tier. The resulting table must still pass the tier checks.
pub async fn add_category(
    pool: &DbPool,
    game: GameType,
    new: NewCategory,
) -> Result<PrizeCategory, ServiceError> {
    let Ok(match_count) = usize::try_from(new.match_count) else {
        return Err(ServiceError::invalid("match_count", "must not be negative"));
    };
    let name = new.name.trim().to_owned();
    if name.is_empty() {
        return Err(ServiceError::invalid("name", "must not be empty"));
    }

    let candidate = lotto_core::PrizeCategory {
        id: 0,
        game_type: game,
        name,
        match_count,
        include_bonus: new.include_bonus,
        prize_amount: new.prize_amount,
        prize_percentage: new.prize_percentage,
    };

    with_connection(pool, move |conn| {
        let mut table = db::prize_categories::get_categories(conn, game)?
            .iter()
            .map(PrizeCategory::to_core)
            .collect::<anyhow::Result<Vec<_>>>()?;
        table.push(candidate.clone());
        check_tiers(game, &table)?;

        let stored = db::prize_categories::insert_category(conn, &PrizeCategory::from_core(&candidate)?)
            .map_err(|e| {
                if db::is_unique_violation(&e) {
                    ServiceError::Conflict(format!(
                        "{game} already has a tier for {} matches (bonus: {})",
                        candidate.match_count, candidate.include_bonus
                    ))
                } else {
                    ServiceError::Internal(e)
                }
            })?;
        log::info!("Added {game} prize category {:?}", stored.name);
        Ok(stored)
    })
    .await
}
