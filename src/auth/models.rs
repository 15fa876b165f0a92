use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::ValidationErrors,
    profile::{Gender, Profile},
    remote::RemoteError,
};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Substring the auth provider uses for a wrong email/password pair.
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// A session this close to its expiry is refreshed before use.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    IncorrectCredentials,
    #[error("You need to sign in first")]
    NotSignedIn,
    #[error("Your session expired, sign in again")]
    SessionExpired,
    #[error("{0}")]
    Provider(String),
    #[error(transparent)]
    Remote(RemoteError),
}

/// Turns a failed sign-in into the message shown to the user.
pub fn map_sign_in_failure(err: RemoteError) -> AuthError {
    match err {
        RemoteError::Status { message, .. } | RemoteError::Api(message) => {
            if message.contains(INVALID_CREDENTIALS) {
                AuthError::IncorrectCredentials
            } else {
                AuthError::Provider(message)
            }
        },
        other => AuthError::Remote(other),
    }
}

impl From<RemoteError> for AuthError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Status { message, .. } | RemoteError::Api(message) => {
                AuthError::Provider(message)
            },
            other => AuthError::Remote(other),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix time after which the access token is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    /// Sessions saved without an expiry are trusted until a call fails.
    pub fn expires_soon(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|at| at - EXPIRY_MARGIN_SECS <= now)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .require("email", &self.email, "Email is required")
            .require("password", &self.password, "Password is required");
        errors.into_result()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub birthdate: String,
    pub password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .require("first_name", &self.first_name, "First name is required")
            .require("last_name", &self.last_name, "Last name is required")
            .require("email", &self.email, "Email is required")
            .require("birthdate", &self.birthdate, "Birthdate is required")
            .require("password", &self.password, "Password is required");
        if !self.password.is_empty() && self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        errors.into_result()
    }

    /// The profile row stored once the identity `user_id` exists.
    pub fn profile(&self, user_id: &str) -> Profile {
        Profile {
            id: user_id.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            gender: self.gender,
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            birthdate: self.birthdate.trim().to_string(),
            created_at: None,
        }
    }
}
