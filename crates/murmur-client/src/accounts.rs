//! Sign-up flow: client-side validation plus account creation.

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use murmur_shared::validation::{validate_email, PasswordCheck};
use murmur_store::{Database, StoreError, UserProfile};

/// Why a sign-up attempt was rejected.
#[derive(Error, Debug)]
pub enum SignUpError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("This email is already registered")]
    EmailTaken,

    #[error("Password must contain: {0}")]
    WeakPassword(String),

    #[error("Please enter a username")]
    EmptyUsername,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Validate the sign-up form and create the profile record.
///
/// Check order matches the mobile client: email shape, duplicate email,
/// password policy, username.  Credentials themselves are held by the
/// external account service; only the public profile is stored.
pub fn sign_up(
    db: &Database,
    email: &str,
    password: &str,
    username: &str,
) -> Result<UserProfile, SignUpError> {
    if !validate_email(email) {
        return Err(SignUpError::InvalidEmail);
    }

    if db.user_exists(email)? {
        return Err(SignUpError::EmailTaken);
    }

    let check = PasswordCheck::of(password);
    if !check.is_valid() {
        return Err(SignUpError::WeakPassword(check.failures().join(", ")));
    }

    if username.trim().is_empty() {
        return Err(SignUpError::EmptyUsername);
    }

    let profile = UserProfile {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: username.to_string(),
        about: "Available".to_string(),
        created_at: Utc::now(),
    };
    db.insert_user(&profile)?;

    info!(email = %profile.email, "Account created");
    Ok(profile)
}
