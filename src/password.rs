//! Password strength checks and salted password hashes.
//!
//! A raw password becomes a [ValidatedPassword] once it is strong enough,
//! and a [ValidatedPassword] becomes a [PasswordHash] once it is hashed with bcrypt.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that is strong enough to use, but not yet hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password` for the account `username`.
    ///
    /// Passwords that contain the username are penalised.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with advice on how to pick a stronger password.
    pub fn new(raw_password: &str, username: &str) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, &[username]);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// Intended for test databases only.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost recommended for stored passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt rejects the cost or fails internally.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash that was read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, PasswordHash, ValidatedPassword};

    #[test]
    fn rejects_empty_password() {
        let result = ValidatedPassword::new("", "alice");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn rejects_short_password() {
        let result = ValidatedPassword::new("imtooshort", "alice");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn accepts_long_password() {
        let result = ValidatedPassword::new("asomewhatlongpassword1", "alice");

        assert!(result.is_ok());
    }

    #[test]
    fn display_hides_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }

    #[test]
    fn hash_verifies_original_password_only() {
        let hash = PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), 4).unwrap();

        assert!(hash.verify("hunter2").unwrap());
        assert!(!hash.verify("hunter3").unwrap());
    }

    #[test]
    fn hash_fails_on_invalid_cost() {
        let result = PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), 0);

        assert!(matches!(result, Err(Error::HashingError(_))));
    }
}
