use anyhow::Context as _;
use diesel::prelude::*;

use crate::db::last_insert_id;
use crate::models::User;
use crate::models::schema::users;

/// Insert a user and return it with its assigned id.
pub fn insert_user(conn: &mut SqliteConnection, user: &User) -> anyhow::Result<User> {
    diesel::insert_into(users::table)
        .values(user)
        .execute(conn)
        .with_context(|| format!("Error inserting user {:?}", user.username))?;

    let id = last_insert_id(conn)?;
    Ok(User {
        id: Some(id),
        ..user.clone()
    })
}

pub fn get_user(conn: &mut SqliteConnection, id: i32) -> anyhow::Result<Option<User>> {
    users::table
        .filter(users::id.eq(id))
        .select(User::as_select())
        .first(conn)
        .optional()
        .with_context(|| format!("Error loading user {id}"))
}

/// Write username, email and update time of a stored user.
pub fn update_user(conn: &mut SqliteConnection, user: &User) -> anyhow::Result<()> {
    let id = user
        .id
        .ok_or_else(|| anyhow::anyhow!("Cannot update a user that has no id"))?;

    let count = diesel::update(users::table.filter(users::id.eq(id)))
        .set((
            users::username.eq(&user.username),
            users::email.eq(&user.email),
            users::updated_at.eq(user.updated_at),
        ))
        .execute(conn)
        .with_context(|| format!("Error updating user {id}"))?;

    if count != 1 {
        anyhow::bail!("Expected to update exactly one user, but updated {count}");
    }
    Ok(())
}
