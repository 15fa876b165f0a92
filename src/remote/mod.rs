//! Typed seams to the hosted collaborators: authentication, profile rows,
//! personality analysis and personality result rows.
//!
//! Every trait is object safe and mocked in tests; [`SupabaseClient`] is the
//! one implementation talking HTTP.

pub mod supabase;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::{AuthUser, Session},
    profile::{Profile, ProfilePatch},
    questionnaire::QuestionResponse,
};

pub use supabase::{SupabaseClient, SupabaseConfig};

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Api(String),
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),
}

impl RemoteError {
    /// The message the collaborator sent back, without transport decoration.
    pub fn message(&self) -> String {
        match self {
            RemoteError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers an identity. The provider may also open a session right away.
    async fn sign_up(&self, email: &str, password: &str) -> RemoteResult<AuthUser>;
    async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<Session>;
    async fn sign_out(&self) -> RemoteResult<()>;
    /// Trades a refresh token for a new session. Publishing it is left to
    /// the caller.
    async fn refresh(&self, refresh_token: &str) -> RemoteResult<Session>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, profile: &Profile) -> RemoteResult<()>;
    async fn fetch_profile(&self, user_id: &str) -> RemoteResult<Profile>;
    async fn update_profile(&self, user_id: &str, patch: &ProfilePatch) -> RemoteResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonalityAnalyzer: Send + Sync {
    /// Sends the ordered answers and returns the free-text analysis.
    async fn analyze(&self, responses: &[QuestionResponse]) -> RemoteResult<String>;
}

/// A row of the `personality_tests` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityResult {
    pub user_id: String,
    /// Answers keyed by question id.
    pub responses: BTreeMap<u8, String>,
    pub gpt_analysis: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save_result(&self, result: &PersonalityResult) -> RemoteResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_row_shape() {
        let row = PersonalityResult {
            user_id: "u-1".to_string(),
            responses: BTreeMap::from([(1, "a".to_string()), (2, "b".to_string())]),
            gpt_analysis: "The Explorer".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::json!({
                "user_id": "u-1",
                "responses": { "1": "a", "2": "b" },
                "gpt_analysis": "The Explorer",
            })
        );
    }

    #[test]
    fn test_status_message_drops_decoration() {
        let err = RemoteError::Status {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(err.message(), "Invalid login credentials");
        assert_eq!(err.to_string(), "Invalid login credentials (status 400)");
    }
}
