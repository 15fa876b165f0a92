use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use super::{
    AuthProvider, PersonalityAnalyzer, PersonalityResult, ProfileStore, RemoteError,
    RemoteResult, ResultStore,
};
use crate::{
    auth::{AuthUser, Session, SessionEvents},
    profile::{Profile, ProfilePatch},
    questionnaire::QuestionResponse,
};

const ANALYSIS_FAILED: &str = "Failed to analyze personality";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project url, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub anon_key: String,
    pub timeout_secs: u64,
}

/// HTTP client for the auth, rest and functions endpoints of one project.
///
/// Requests are authenticated with the access token of the session currently
/// published on `events`, or with the anon key when nobody is signed in.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
    events: SessionEvents,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Token endpoints answer with a lifetime in seconds, sometimes without the
/// absolute expiry.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(flatten)]
    session: Session,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let mut session = self.session;
        if session.expires_at.is_none() {
            session.expires_at = self
                .expires_in
                .map(|secs| Utc::now().timestamp() + secs);
        }
        session
    }
}

#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    responses: &'a [QuestionResponse],
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    analysis: String,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig, events: SessionEvents) -> RemoteResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(SupabaseClient {
            http,
            config,
            events,
        })
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.url.trim_end_matches('/'))
    }

    fn bearer(&self) -> String {
        self.events
            .current()
            .map(|session| session.access_token)
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer())
    }

    /// Same as [`Self::request`] but never sends the session token.
    fn anon_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    fn profile_filter(user_id: &str) -> String {
        format!("/rest/v1/profiles?id=eq.{}", urlencoding::encode(user_id))
    }
}

/// Passes 2xx responses through and turns anything else into
/// [`RemoteError::Status`] carrying the collaborator's own message.
async fn check(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    });
    error!(status = status.as_u16(), %message, "collaborator request failed");
    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Auth, rest and functions endpoints do not agree on the error field name.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// The sign-up endpoint answers with a full session when email confirmation
/// is off, and with the bare user otherwise.
pub fn parse_sign_up(value: Value) -> RemoteResult<(AuthUser, Option<Session>)> {
    if value.get("access_token").is_some() {
        let session = serde_json::from_value::<TokenResponse>(value)
            .map_err(|err| RemoteError::Api(format!("Unexpected sign up response: {err}")))?
            .into_session();
        return Ok((session.user.clone(), Some(session)));
    }
    let user = value
        .get("user")
        .cloned()
        .unwrap_or(value);
    match serde_json::from_value::<AuthUser>(user) {
        Ok(user) if !user.id.is_empty() => Ok((user, None)),
        _ => Err(RemoteError::Api("No user returned after signup".to_string())),
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> RemoteResult<AuthUser> {
        let response = self
            .request(Method::POST, "/auth/v1/signup")
            .json(&Credentials { email, password })
            .send()
            .await?;
        let value: Value = check(response).await?.json().await?;
        let (user, session) = parse_sign_up(value)?;
        info!(user_id = %user.id, signed_in = session.is_some(), "signed up");
        if session.is_some() {
            self.events.publish(session);
        }
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<Session> {
        let response = self
            .request(Method::POST, "/auth/v1/token?grant_type=password")
            .json(&Credentials { email, password })
            .send()
            .await?;
        let session = check(response)
            .await?
            .json::<TokenResponse>()
            .await?
            .into_session();
        info!(user_id = %session.user.id, "signed in");
        self.events.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> RemoteResult<()> {
        let result = match self
            .request(Method::POST, "/auth/v1/logout")
            .send()
            .await
        {
            Ok(response) => check(response).await.map(|_| ()),
            Err(err) => Err(err.into()),
        };
        // The local session is dropped even when the provider call fails.
        self.events.publish(None);
        info!("signed out");
        result
    }

    async fn refresh(&self, refresh_token: &str) -> RemoteResult<Session> {
        let response = self
            .anon_request(Method::POST, "/auth/v1/token?grant_type=refresh_token")
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let session = check(response)
            .await?
            .json::<TokenResponse>()
            .await?
            .into_session();
        debug!(user_id = %session.user.id, expires_at = ?session.expires_at, "token refreshed");
        Ok(session)
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn create_profile(&self, profile: &Profile) -> RemoteResult<()> {
        let response = self
            .request(Method::POST, "/rest/v1/profiles")
            .header("Prefer", "return=minimal")
            .json(&[profile])
            .send()
            .await?;
        check(response).await?;
        info!(user_id = %profile.id, "profile created");
        Ok(())
    }

    async fn fetch_profile(&self, user_id: &str) -> RemoteResult<Profile> {
        let path = format!("{}&select=*", Self::profile_filter(user_id));
        let response = self
            .request(Method::GET, &path)
            .header(header::ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;
        let profile = check(response).await?.json().await?;
        debug!(user_id, "profile fetched");
        Ok(profile)
    }

    async fn update_profile(&self, user_id: &str, patch: &ProfilePatch) -> RemoteResult<()> {
        let response = self
            .request(Method::PATCH, &Self::profile_filter(user_id))
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        check(response).await?;
        info!(user_id, "profile updated");
        Ok(())
    }
}

#[async_trait]
impl PersonalityAnalyzer for SupabaseClient {
    async fn analyze(&self, responses: &[QuestionResponse]) -> RemoteResult<String> {
        let response = self
            .anon_request(Method::POST, "/functions/v1/analyze-personality")
            .json(&AnalysisRequest { responses })
            .send()
            .await?;
        if !response.status().is_success() {
            error!(status = response.status().as_u16(), "analysis request rejected");
            return Err(RemoteError::Api(ANALYSIS_FAILED.to_string()));
        }
        let body: AnalysisResponse = response.json().await?;
        info!(answers = responses.len(), "personality analyzed");
        Ok(body.analysis)
    }
}

#[async_trait]
impl ResultStore for SupabaseClient {
    async fn save_result(&self, result: &PersonalityResult) -> RemoteResult<()> {
        let response = self
            .request(Method::POST, "/rest/v1/personality_tests")
            .header("Prefer", "return=minimal")
            .json(&[result])
            .send()
            .await?;
        check(response).await?;
        info!(user_id = %result.user_id, "personality result stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{self, AuthError, SignInForm};
    use crate::error::BrainError;
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    /// Reads one request, headers and body, off the wire.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answers a single request with `status` and `body`, handing back the
    /// raw request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        });
        (url, handle)
    }

    fn local_client(url: String, events: SessionEvents) -> SupabaseClient {
        SupabaseClient::new(
            SupabaseConfig {
                url,
                anon_key: "anon".to_string(),
                timeout_secs: 5,
            },
            events,
        )
        .unwrap()
    }

    fn client() -> SupabaseClient {
        SupabaseClient::new(
            SupabaseConfig {
                url: "https://demo.supabase.co/".to_string(),
                anon_key: "anon".to_string(),
                timeout_secs: 5,
            },
            SessionEvents::new(None),
        )
        .unwrap()
    }

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: None,
            expires_at: None,
            user: AuthUser {
                id: "u-1".to_string(),
                email: "alex@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            client().endpoint("/auth/v1/signup"),
            "https://demo.supabase.co/auth/v1/signup"
        );
    }

    #[test]
    fn test_bearer_follows_published_session() {
        let client = client();
        assert_eq!(client.bearer(), "anon");

        client.events().publish(Some(session("jwt")));
        assert_eq!(client.bearer(), "jwt");

        client.events().publish(None);
        assert_eq!(client.bearer(), "anon");
    }

    #[test]
    fn test_profile_filter_is_url_encoded() {
        assert_eq!(
            SupabaseClient::profile_filter("a b"),
            "/rest/v1/profiles?id=eq.a%20b"
        );
    }

    #[test]
    fn test_error_message_fields() {
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            Some("Invalid login credentials".to_string())
        );
        assert_eq!(
            error_message(r#"{"msg":"User already registered"}"#),
            Some("User already registered".to_string())
        );
        assert_eq!(
            error_message(r#"{"message":"permission denied"}"#),
            Some("permission denied".to_string())
        );
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn test_parse_sign_up_with_session() {
        let value = json!({
            "access_token": "jwt",
            "refresh_token": "r",
            "user": { "id": "u-1", "email": "alex@example.com" },
        });
        let (user, session) = parse_sign_up(value).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(session.unwrap().refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn test_parse_sign_up_without_session() {
        let (user, session) =
            parse_sign_up(json!({ "id": "u-2", "email": "sam@example.com" })).unwrap();
        assert_eq!(user.email, "sam@example.com");
        assert!(session.is_none());

        let err = parse_sign_up(json!({})).unwrap_err();
        assert_eq!(err.to_string(), "No user returned after signup");
    }

    #[test]
    fn test_analysis_request_body() {
        let responses = vec![QuestionResponse {
            id: 1,
            question: "Q".to_string(),
            answer: "A".to_string(),
        }];
        assert_eq!(
            serde_json::to_value(AnalysisRequest {
                responses: &responses
            })
            .unwrap(),
            json!({ "responses": [{ "id": 1, "question": "Q", "answer": "A" }] })
        );
    }

    #[tokio::test]
    async fn test_analyze_failure_is_generic() {
        let (url, server) =
            serve_once("500 Internal Server Error", r#"{"error":"model overloaded"}"#).await;
        let client = local_client(url, SessionEvents::new(Some(session("jwt"))));

        let err = client.analyze(&[]).await.unwrap_err();
        assert!(matches!(&err, RemoteError::Api(message) if message == "Failed to analyze personality"));

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("post /functions/v1/analyze-personality "));
        assert!(request.contains("authorization: bearer anon"));
    }

    #[tokio::test]
    async fn test_analyze_returns_analysis() {
        let (url, server) = serve_once("200 OK", r#"{"analysis":"The Gardener"}"#).await;
        let client = local_client(url, SessionEvents::new(None));

        assert_eq!(client.analyze(&[]).await.unwrap(), "The Gardener");
        assert!(server.await.unwrap().contains(r#"{"responses":[]}"#));
    }

    #[tokio::test]
    async fn test_wrong_password_reads_as_incorrect_credentials() {
        let (url, server) = serve_once(
            "400 Bad Request",
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .await;
        let events = SessionEvents::new(None);
        let client = local_client(url, events.clone());
        let form = SignInForm {
            email: "alex@example.com".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = auth::sign_in(&client, &form).await.unwrap_err();
        assert!(matches!(err, BrainError::Auth(AuthError::IncorrectCredentials)));
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert!(events.current().is_none());
        assert!(server
            .await
            .unwrap()
            .starts_with("POST /auth/v1/token?grant_type=password "));
    }

    #[tokio::test]
    async fn test_sign_in_publishes_session_with_expiry() {
        let (url, _server) = serve_once(
            "200 OK",
            r#"{"access_token":"jwt","refresh_token":"r","expires_in":3600,"user":{"id":"u-1","email":"alex@example.com"}}"#,
        )
        .await;
        let events = SessionEvents::new(None);
        let client = local_client(url, events.clone());

        let before = Utc::now().timestamp();
        let session = client.sign_in("alex@example.com", "secret1").await.unwrap();
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at >= before + 3600 && expires_at <= Utc::now().timestamp() + 3600);
        assert_eq!(events.current(), Some(session));
    }

    #[tokio::test]
    async fn test_refresh_uses_refresh_grant_and_anon_key() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"access_token":"fresh","refresh_token":"r2","expires_at":4102444800,"user":{"id":"u-1"}}"#,
        )
        .await;
        let events = SessionEvents::new(Some(session("stale")));
        let client = local_client(url, events.clone());

        let fresh = client.refresh("r1").await.unwrap();
        assert_eq!(fresh.access_token, "fresh");
        assert_eq!(fresh.expires_at, Some(4_102_444_800));
        assert_eq!(events.current().unwrap().access_token, "stale");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /auth/v1/token?grant_type=refresh_token "));
        assert!(request.to_lowercase().contains("authorization: bearer anon"));
        assert!(request.contains(r#"{"refresh_token":"r1"}"#));
    }

    #[tokio::test]
    async fn test_rejected_write_keeps_provider_message() {
        let (url, server) =
            serve_once("401 Unauthorized", r#"{"message":"JWT expired"}"#).await;
        let client = local_client(url, SessionEvents::new(Some(session("jwt"))));
        let row = PersonalityResult {
            user_id: "u-1".to_string(),
            responses: Default::default(),
            gpt_analysis: "The Gardener".to_string(),
        };

        match client.save_result(&row).await.unwrap_err() {
            RemoteError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "JWT expired");
            },
            other => panic!("unexpected error {other:?}"),
        }
        assert!(server
            .await
            .unwrap()
            .to_lowercase()
            .contains("authorization: bearer jwt"));
    }
}
