use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Registered player. Username and email are unique across users.
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::models::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: Option<i32>,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("username must be 3-32 characters of letters, digits, '_' or '-'")]
    InvalidUsername,
    #[error("email {0:?} is not a valid address")]
    InvalidEmail(String),
}

impl UserError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidUsername => "username",
            Self::InvalidEmail(_) => "email",
        }
    }
}

impl User {
    pub fn new(username: &str, email: &str) -> Result<Self, Vec<UserError>> {
        let now = chrono::Utc::now().naive_utc();
        let user = Self {
            id: None,
            username: username.trim().to_owned(),
            email: email.trim().to_lowercase(),
            created_at: now,
            updated_at: now,
        };
        user.check()?;
        Ok(user)
    }

    /// Profile update; keeps id and creation time.
    pub fn with_profile(&self, username: Option<&str>, email: Option<&str>) -> Result<Self, Vec<UserError>> {
        let user = Self {
            username: username.map_or_else(|| self.username.clone(), |u| u.trim().to_owned()),
            email: email.map_or_else(|| self.email.clone(), |e| e.trim().to_lowercase()),
            updated_at: chrono::Utc::now().naive_utc(),
            ..self.clone()
        };
        user.check()?;
        Ok(user)
    }

    pub fn check(&self) -> Result<(), Vec<UserError>> {
        let mut errors = Vec::new();

        let len = self.username.chars().count();
        if !(3..=32).contains(&len)
            || !self
                .username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            errors.push(UserError::InvalidUsername);
        }

        let valid_email = self
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
            });
        if !valid_email || self.email.chars().any(char::is_whitespace) {
            errors.push(UserError::InvalidEmail(self.email.clone()));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
