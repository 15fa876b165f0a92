use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use super::{AuthError, Session};
use crate::state::FileSaver;

/// Broadcasts the current session whenever someone signs in or out.
///
/// Clones share the same channel, so the HTTP client and the CLI observe the
/// same value.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: Arc<watch::Sender<Option<Session>>>,
}

impl SessionEvents {
    pub fn new(initial: Option<Session>) -> Self {
        let (sender, _) = watch::channel(initial);
        SessionEvents {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, session: Option<Session>) {
        debug!(signed_in = session.is_some(), "session changed");
        self.sender.send_replace(session);
    }

    pub fn current(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }

    /// The signed-in session, for commands that cannot run anonymously.
    pub fn require(&self) -> Result<Session, AuthError> {
        self.current().ok_or(AuthError::NotSignedIn)
    }
}

/// The session carried between two runs of the CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub session: Option<Session>,
}

impl FileSaver for StoredSession {
    fn seed() -> Self {
        StoredSession::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;

    fn session() -> Session {
        Session {
            access_token: "jwt".to_string(),
            refresh_token: Some("r".to_string()),
            expires_at: None,
            user: AuthUser {
                id: "u-1".to_string(),
                email: "alex@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_require_gates_on_session() {
        let events = SessionEvents::new(None);
        assert!(matches!(events.require(), Err(AuthError::NotSignedIn)));

        events.publish(Some(session()));
        assert_eq!(events.require().unwrap().user.id, "u-1");
    }

    #[tokio::test]
    async fn test_subscribers_see_sign_out() {
        let events = SessionEvents::new(Some(session()));
        let mut rx = events.subscribe();
        let clone = events.clone();

        clone.publish(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
        assert!(events.current().is_none());
    }

    #[test]
    fn test_stored_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(StoredSession::get_or_create(dir.path()).unwrap().session, None);

        let stored = StoredSession {
            session: Some(session()),
        };
        stored.save_changes(dir.path()).unwrap();
        assert!(dir.path().join("stored_session.json").exists());
        assert_eq!(StoredSession::get_or_create(dir.path()).unwrap(), stored);
    }
}
