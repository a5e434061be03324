use anyhow::Context as _;
use diesel::prelude::*;
use lotto_core::GameType;

use crate::db::last_insert_id;
use crate::models::PrizeCategory;
use crate::models::schema::prize_categories;

pub fn insert_category(
    conn: &mut SqliteConnection,
    category: &PrizeCategory,
) -> anyhow::Result<PrizeCategory> {
    diesel::insert_into(prize_categories::table)
        .values(category)
        .execute(conn)
        .with_context(|| {
            format!(
                "Error inserting prize category {:?} for {}",
                category.name, category.game_type
            )
        })?;

    let id = last_insert_id(conn)?;
    Ok(PrizeCategory {
        id: Some(id),
        ..category.clone()
    })
}

/// Categories of `game` in precedence order.
pub fn get_categories(conn: &mut SqliteConnection, game: GameType) -> anyhow::Result<Vec<PrizeCategory>> {
    prize_categories::table
        .filter(prize_categories::game_type.eq(game.id()))
        .order((
            prize_categories::match_count.desc(),
            prize_categories::include_bonus.desc(),
            prize_categories::id.asc(),
        ))
        .select(PrizeCategory::as_select())
        .load(conn)
        .with_context(|| format!("Error loading {game} prize categories"))
}

pub fn count_categories(conn: &mut SqliteConnection, game: GameType) -> anyhow::Result<i64> {
    prize_categories::table
        .filter(prize_categories::game_type.eq(game.id()))
        .count()
        .get_result(conn)
        .with_context(|| format!("Error counting {game} prize categories"))
}
