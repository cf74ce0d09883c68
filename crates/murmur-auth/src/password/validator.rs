//! Signup input policy enforcement.

use murmur_core::config::auth::AuthConfig;
use murmur_core::error::AppError;

/// Validates passwords and usernames against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        // Entropy floor on top of the character classes
        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < zxcvbn::Score::Two {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password.",
            ));
        }

        Ok(())
    }

    /// Validates a username: 3-20 characters of letters, digits, and
    /// underscores.
    pub fn validate_username(&self, username: &str) -> Result<(), AppError> {
        let valid_len = (3..=20).contains(&username.len());
        let valid_chars = username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_len || !valid_chars {
            return Err(AppError::validation(
                "Username must be 3-20 characters and contain only letters, numbers, and underscores",
            ));
        }

        Ok(())
    }
}
