use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::{error, info, warn};

use harvest_db::UserRepository;
use harvest_types::models::User;

pub const MIN_PASSWORD_CHARS: usize = 4;

/// Display strings are shown to the user verbatim.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username is required.")]
    MissingUsername,

    #[error("Password too short (min 4 chars).")]
    PasswordTooShort,

    #[error("Username already exists.")]
    DuplicateUsername,

    /// Same error for unknown users and wrong passwords.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Something went wrong. Please try again.")]
    Internal(anyhow::Error),
}

/// Registration and login over an injected [`UserRepository`]. Passwords are
/// stored as Argon2id PHC strings.
pub struct CredentialStore {
    repo: Arc<dyn UserRepository>,
    /// Verified against when the username is unknown, so a miss costs the
    /// same as a wrong password.
    dummy_hash: Arc<str>,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn UserRepository>) -> anyhow::Result<Self> {
        let dummy_hash = hash_password("harvest-dummy-password")?;
        Ok(Self {
            repo,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::MissingUsername);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::PasswordTooShort);
        }

        // Hashing and SQLite are both blocking
        let repo = self.repo.clone();
        let email = email.trim().to_string();
        let password = password.to_string();
        let name = username.clone();
        let created = tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
            let password_hash = hash_password(&password)?;
            repo.create_user(&name, &email, &password_hash)
        })
        .await
        .map_err(|e| internal("spawn_blocking join error", e.into()))?
        .map_err(|e| internal("create_user failed", e))?;

        if !created {
            info!("Registration rejected, username {} taken", username);
            return Err(AuthError::DuplicateUsername);
        }

        info!("Registered user {}", username);
        Ok(())
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let repo = self.repo.clone();
        let dummy_hash = self.dummy_hash.clone();
        let username = username.trim().to_string();
        let password = password.to_string();

        let user = tokio::task::spawn_blocking(move || {
            let row = repo.get_user_by_username(&username)?;
            let (stored_hash, user) = match row {
                Some(row) => (
                    row.password,
                    Some(User {
                        username: row.username,
                        email: row.email,
                    }),
                ),
                None => (dummy_hash.to_string(), None),
            };

            let matches = verify_password(&password, &stored_hash);
            Ok::<_, anyhow::Error>(user.filter(|_| matches))
        })
        .await
        .map_err(|e| internal("spawn_blocking join error", e.into()))?
        .map_err(|e| internal("get_user_by_username failed", e))?;

        user.ok_or(AuthError::InvalidCredentials)
    }
}

fn internal(context: &str, e: anyhow::Error) -> AuthError {
    error!("{}: {:#}", context, e);
    AuthError::Internal(e)
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {}", e))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is not a valid PHC string: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
