use anyhow::Context as _;
use diesel::prelude::*;
use lotto_core::GameType;

use crate::db::last_insert_id;
use crate::models::Drawing;
use crate::models::schema::drawings;

/// Drawings are never updated after this.
pub fn insert_drawing(conn: &mut SqliteConnection, drawing: &Drawing) -> anyhow::Result<Drawing> {
    let count = diesel::insert_into(drawings::table)
        .values(drawing)
        .execute(conn)
        .with_context(|| format!("Error inserting drawing {drawing}"))?;
    if count != 1 {
        anyhow::bail!("Expected to insert exactly one drawing, but inserted {count}");
    }

    let id = last_insert_id(conn)?;
    Ok(Drawing {
        id: Some(id),
        ..drawing.clone()
    })
}

pub fn get_drawing(conn: &mut SqliteConnection, id: i32) -> anyhow::Result<Option<Drawing>> {
    drawings::table
        .filter(drawings::id.eq(id))
        .select(Drawing::as_select())
        .first(conn)
        .optional()
        .with_context(|| format!("Error loading drawing {id}"))
}

pub fn get_latest_drawing(conn: &mut SqliteConnection, game: GameType) -> anyhow::Result<Option<Drawing>> {
    drawings::table
        .filter(drawings::game_type.eq(game.id()))
        .order((drawings::draw_time.desc(), drawings::id.desc()))
        .select(Drawing::as_select())
        .first(conn)
        .optional()
        .with_context(|| format!("Error loading latest {game} drawing"))
}

/// Newest first.
pub fn get_recent_drawings(
    conn: &mut SqliteConnection,
    game: GameType,
    limit: i64,
) -> anyhow::Result<Vec<Drawing>> {
    drawings::table
        .filter(drawings::game_type.eq(game.id()))
        .order((drawings::draw_time.desc(), drawings::id.desc()))
        .limit(limit)
        .select(Drawing::as_select())
        .load(conn)
        .with_context(|| format!("Error loading latest {limit} {game} drawings"))
}
