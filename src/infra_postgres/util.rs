use crate::domain_port::UserRepoError;

pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const USERS_USERNAME_KEY: &str = "users_username_key";

/// Unique constraints on `users` that carry domain meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserConstraint {
    Email,
    Username,
}

impl UserConstraint {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            USERS_EMAIL_KEY => Some(UserConstraint::Email),
            USERS_USERNAME_KEY => Some(UserConstraint::Username),
            _ => None,
        }
    }
}

impl From<UserConstraint> for UserRepoError {
    fn from(constraint: UserConstraint) -> Self {
        match constraint {
            UserConstraint::Email => UserRepoError::EmailAlreadyExists,
            UserConstraint::Username => UserRepoError::UsernameAlreadyExists,
        }
    }
}

pub fn violated_constraint(err: &sqlx::Error) -> Option<UserConstraint> {
    let db = err.as_database_error()?;
    if !db.is_unique_violation() {
        return None;
    }
    db.constraint().and_then(UserConstraint::from_name)
}

/// Wraps a failed insert, turning known unique violations into conflicts.
pub fn insert_error(err: sqlx::Error, context: impl std::fmt::Display) -> UserRepoError {
    match violated_constraint(&err) {
        Some(constraint) => constraint.into(),
        None => UserRepoError::Store(format!("{context}: {err}")),
    }
}
