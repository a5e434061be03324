use anyhow::Context as _;
use diesel::prelude::*;

use crate::models::DrawingResult;
use crate::models::schema::drawing_results;

/// Insert unless a result for the same (ticket, drawing) exists. Returns whether a row was written.
pub fn insert_result_if_absent(
    conn: &mut SqliteConnection,
    result: &DrawingResult,
) -> anyhow::Result<bool> {
    let count = diesel::insert_or_ignore_into(drawing_results::table)
        .values(result)
        .execute(conn)
        .with_context(|| {
            format!(
                "Error inserting result of ticket {} in drawing {}",
                result.ticket_id, result.drawing_id
            )
        })?;
    Ok(count == 1)
}

pub fn get_result(
    conn: &mut SqliteConnection,
    ticket_id: i32,
    drawing_id: i32,
) -> anyhow::Result<Option<DrawingResult>> {
    drawing_results::table
        .filter(drawing_results::ticket_id.eq(ticket_id))
        .filter(drawing_results::drawing_id.eq(drawing_id))
        .select(DrawingResult::as_select())
        .first(conn)
        .optional()
        .with_context(|| format!("Error loading result of ticket {ticket_id} in drawing {drawing_id}"))
}

pub fn has_results(conn: &mut SqliteConnection, drawing_id: i32) -> anyhow::Result<bool> {
    diesel::select(diesel::dsl::exists(
        drawing_results::table.filter(drawing_results::drawing_id.eq(drawing_id)),
    ))
    .get_result(conn)
    .with_context(|| format!("Error checking results of drawing {drawing_id}"))
}

pub fn get_results_by_drawing(
    conn: &mut SqliteConnection,
    drawing_id: i32,
) -> anyhow::Result<Vec<DrawingResult>> {
    drawing_results::table
        .filter(drawing_results::drawing_id.eq(drawing_id))
        .order(drawing_results::ticket_id.asc())
        .select(DrawingResult::as_select())
        .load(conn)
        .with_context(|| format!("Error loading results of drawing {drawing_id}"))
}
