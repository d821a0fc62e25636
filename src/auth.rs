//! Registering users and checking their credentials.
//!
//! A successful [log_in] yields the [UserID] that every ledger, budget and
//! report operation is scoped to.

use rusqlite::Connection;

use crate::{
    Error, PasswordHash, ValidatedPassword, ValidationError,
    user::{User, UserID, create_user, get_user_by_username},
};

/// Register a new user.
///
/// `cost` is the bcrypt cost, use [PasswordHash::DEFAULT_COST] outside of tests.
///
/// # Errors
///
/// Returns a:
/// - [ValidationError::EmptyUsername] if `username` is blank,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - [Error::DuplicateUsername] if `username` is taken,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn register_user(
    username: &str,
    raw_password: &str,
    cost: u32,
    connection: &Connection,
) -> Result<User, Error> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::EmptyUsername.into());
    }

    let password = ValidatedPassword::new(raw_password, username)?;
    let password_hash = PasswordHash::new(password, cost)?;
    let user = create_user(username, password_hash, connection)?;

    tracing::info!("Registered user {} with ID {}", user.username, user.id);

    Ok(user)
}

/// Check `raw_password` against the password stored for `username`.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the user does not exist or the
/// password is wrong. The two cases are not distinguished.
pub fn log_in(username: &str, raw_password: &str, connection: &Connection) -> Result<UserID, Error> {
    let user = match get_user_by_username(username.trim(), connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            tracing::info!("Log in failed: unknown username {username}");
            return Err(Error::InvalidCredentials);
        }
        Err(error) => return Err(error),
    };

    match user.password_hash.verify(raw_password) {
        Ok(true) => {
            tracing::debug!("User {} logged in", user.id);
            Ok(user.id)
        }
        Ok(false) => {
            tracing::info!("Log in failed: wrong password for user {}", user.id);
            Err(Error::InvalidCredentials)
        }
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, ValidationError, db::initialize, log_in, register_user};

    const PASSWORD: &str = "asomewhatlongpassword1";

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn register_then_log_in() {
        let conn = get_test_connection();

        let user = register_user("alice", PASSWORD, 4, &conn).unwrap();
        let user_id = log_in("alice", PASSWORD, &conn).unwrap();

        assert_eq!(user.id, user_id);
    }

    #[test]
    fn register_trims_username() {
        let conn = get_test_connection();

        let user = register_user("  alice ", PASSWORD, 4, &conn).unwrap();

        assert_eq!(user.username, "alice");
    }

    #[test]
    fn register_rejects_blank_username() {
        let conn = get_test_connection();

        let result = register_user("  ", PASSWORD, 4, &conn);

        assert_eq!(result, Err(Error::Validation(ValidationError::EmptyUsername)));
    }

    #[test]
    fn register_rejects_weak_password() {
        let conn = get_test_connection();

        let result = register_user("alice", "password", 4, &conn);

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn register_rejects_duplicate_username() {
        let conn = get_test_connection();
        register_user("alice", PASSWORD, 4, &conn).unwrap();

        let result = register_user("alice", PASSWORD, 4, &conn);

        assert_eq!(result, Err(Error::DuplicateUsername("alice".to_owned())));
    }

    #[test]
    fn log_in_fails_with_wrong_password() {
        let conn = get_test_connection();
        register_user("alice", PASSWORD, 4, &conn).unwrap();

        let result = log_in("alice", "notthepassword", &conn);

        assert_eq!(result, Err(Error::InvalidCredentials));
    }

    #[test]
    fn log_in_fails_with_unknown_user() {
        let conn = get_test_connection();

        let result = log_in("mallory", PASSWORD, &conn);

        assert_eq!(result, Err(Error::InvalidCredentials));
    }
}
