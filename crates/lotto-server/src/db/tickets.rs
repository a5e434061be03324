use anyhow::Context as _;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use lotto_core::GameType;

use crate::db::last_insert_id;
use crate::models::Ticket;
use crate::models::schema::tickets;

pub fn insert_ticket(conn: &mut SqliteConnection, ticket: &Ticket) -> anyhow::Result<Ticket> {
    let count = diesel::insert_into(tickets::table)
        .values(ticket)
        .execute(conn)
        .with_context(|| format!("Error inserting ticket {ticket}"))?;
    if count != 1 {
        anyhow::bail!("Expected to insert exactly one ticket, but inserted {count}");
    }

    let id = last_insert_id(conn)?;
    Ok(Ticket {
        id: Some(id),
        ..ticket.clone()
    })
}

pub fn get_ticket(conn: &mut SqliteConnection, id: i32) -> anyhow::Result<Option<Ticket>> {
    tickets::table
        .filter(tickets::id.eq(id))
        .select(Ticket::as_select())
        .first(conn)
        .optional()
        .with_context(|| format!("Error loading ticket {id}"))
}

pub fn get_tickets_by_user(conn: &mut SqliteConnection, user_id: i32) -> anyhow::Result<Vec<Ticket>> {
    tickets::table
        .filter(tickets::user_id.eq(user_id))
        .order(tickets::id.desc())
        .select(Ticket::as_select())
        .load(conn)
        .with_context(|| format!("Error loading tickets of user {user_id}"))
}

pub fn get_tickets_by_drawing(
    conn: &mut SqliteConnection,
    drawing_id: i32,
) -> anyhow::Result<Vec<Ticket>> {
    tickets::table
        .filter(tickets::drawing_id.eq(drawing_id))
        .order(tickets::id.asc())
        .select(Ticket::as_select())
        .load(conn)
        .with_context(|| format!("Error loading tickets of drawing {drawing_id}"))
}

/// Attach an unattached ticket. Returns false when the ticket already had a drawing.
pub fn attach_drawing(
    conn: &mut SqliteConnection,
    ticket_id: i32,
    drawing_id: i32,
) -> anyhow::Result<bool> {
    let count = diesel::update(
        tickets::table
            .filter(tickets::id.eq(ticket_id))
            .filter(tickets::drawing_id.is_null()),
    )
    .set(tickets::drawing_id.eq(drawing_id))
    .execute(conn)
    .with_context(|| format!("Error attaching ticket {ticket_id} to drawing {drawing_id}"))?;
    Ok(count == 1)
}

/// Attach every unattached ticket of `game` bought at or before `draw_time`.
pub fn attach_pending(
    conn: &mut SqliteConnection,
    game: GameType,
    draw_time: NaiveDateTime,
    drawing_id: i32,
) -> anyhow::Result<usize> {
    diesel::update(
        tickets::table
            .filter(tickets::game_type.eq(game.id()))
            .filter(tickets::drawing_id.is_null())
            .filter(tickets::created_at.le(draw_time)),
    )
    .set(tickets::drawing_id.eq(drawing_id))
    .execute(conn)
    .with_context(|| format!("Error attaching pending {game} tickets to drawing {drawing_id}"))
}

pub fn set_prize_category(
    conn: &mut SqliteConnection,
    ticket_id: i32,
    prize_category_id: Option<i32>,
) -> anyhow::Result<()> {
    diesel::update(tickets::table.filter(tickets::id.eq(ticket_id)))
        .set(tickets::prize_category_id.eq(prize_category_id))
        .execute(conn)
        .with_context(|| format!("Error setting prize category of ticket {ticket_id}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{drawings, get_connection, test_pool, users};
    use crate::models::{Drawing, User};

    fn setup(conn: &mut SqliteConnection) -> anyhow::Result<i32> {
        let user = users::insert_user(conn, &User::new("henry", "henry@example.com").unwrap())?;
        Ok(user.id.unwrap_or_default())
    }

    #[test]
    fn insert_and_list_by_user() -> anyhow::Result<()> {
        let pool = test_pool();
        let mut conn = get_connection(&pool)?;
        let user_id = setup(&mut conn)?;

        let first = insert_ticket(&mut conn, &Ticket::new(user_id, GameType::Mega645, &[1, 2, 3, 4, 5, 6], None)?)?;
        let second = insert_ticket(&mut conn, &Ticket::new(user_id, GameType::Power655, &[7, 8, 9, 10, 11, 12], None)?)?;

        let listed = get_tickets_by_user(&mut conn, user_id)?;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert!(get_tickets_by_user(&mut conn, user_id + 1)?.is_empty());
        Ok(())
    }

    #[test]
    fn attach_pending_only_takes_matching_game() -> anyhow::Result<()> {
        let pool = test_pool();
        let mut conn = get_connection(&pool)?;
        let user_id = setup(&mut conn)?;

        let mega = insert_ticket(&mut conn, &Ticket::new(user_id, GameType::Mega645, &[1, 2, 3, 4, 5, 6], None)?)?;
        let power = insert_ticket(&mut conn, &Ticket::new(user_id, GameType::Power655, &[1, 2, 3, 4, 5, 6], None)?)?;

        let draw_time = chrono::Utc::now().naive_utc() + chrono::Duration::minutes(5);
        let drawing = drawings::insert_drawing(
            &mut conn,
            &Drawing::new(GameType::Mega645, &[10, 20, 30, 40, 41, 42], None, draw_time)?,
        )?;
        let drawing_id = drawing.id.unwrap_or_default();

        assert_eq!(attach_pending(&mut conn, GameType::Mega645, draw_time, drawing_id)?, 1);
        assert_eq!(get_tickets_by_drawing(&mut conn, drawing_id)?[0].id, mega.id);

        let power = get_ticket(&mut conn, power.id.unwrap_or_default())?.unwrap();
        assert_eq!(power.drawing_id, None);

        // already attached
        assert!(!attach_drawing(&mut conn, mega.id.unwrap_or_default(), drawing_id)?);
        Ok(())
    }
}
