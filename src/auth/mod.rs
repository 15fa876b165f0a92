//! Sign up, sign in and sign out on top of the [`AuthProvider`] and
//! [`ProfileStore`] collaborators.

pub mod cli;
pub mod models;
pub mod session;

use tracing::{error, info, warn};

use crate::{
    error::Result,
    profile::Profile,
    remote::{AuthProvider, ProfileStore, RemoteError},
};

pub use cli::AuthArgs;
pub use models::{
    map_sign_in_failure, AuthError, AuthUser, Session, SignInForm, SignUpForm,
    EXPIRY_MARGIN_SECS, INVALID_CREDENTIALS, MIN_PASSWORD_LEN,
};
pub use session::{SessionEvents, StoredSession};

/// Creates the identity, then the profile row keyed by its id.
pub async fn sign_up(
    auth: &dyn AuthProvider,
    profiles: &dyn ProfileStore,
    form: &SignUpForm,
) -> Result<Profile> {
    form.validate()?;
    let user = auth
        .sign_up(form.email.trim(), &form.password)
        .await
        .map_err(AuthError::from)?;
    let profile = form.profile(&user.id);
    if let Err(err) = profiles.create_profile(&profile).await {
        error!(user_id = %user.id, %err, "profile creation failed after sign up");
        return Err(AuthError::from(err).into());
    }
    info!(user_id = %user.id, "account created");
    Ok(profile)
}

pub async fn sign_in(auth: &dyn AuthProvider, form: &SignInForm) -> Result<Session> {
    form.validate()?;
    let session = auth
        .sign_in(form.email.trim(), &form.password)
        .await
        .map_err(map_sign_in_failure)?;
    Ok(session)
}

pub async fn sign_out(auth: &dyn AuthProvider) -> Result<()> {
    auth.sign_out().await.map_err(AuthError::from)?;
    Ok(())
}

/// Replaces a published session that expires before `now` plus the margin.
///
/// Returns whether a new session was published. A refresh token the provider
/// rejects, or a missing one, signs the user out; transport failures leave
/// the session as it was.
pub async fn refresh_session(
    auth: &dyn AuthProvider,
    events: &SessionEvents,
    now: i64,
) -> Result<bool> {
    let Some(session) = events.current() else {
        return Ok(false);
    };
    if !session.expires_soon(now) {
        return Ok(false);
    }
    let Some(refresh_token) = session.refresh_token.as_deref() else {
        warn!(user_id = %session.user.id, "expired session without refresh token");
        events.publish(None);
        return Err(AuthError::SessionExpired.into());
    };
    match auth.refresh(refresh_token).await {
        Ok(fresh) => {
            info!(user_id = %fresh.user.id, "session refreshed");
            events.publish(Some(fresh));
            Ok(true)
        },
        Err(RemoteError::Status { status, message }) if status == 400 || status == 401 => {
            warn!(status, %message, "refresh token rejected");
            events.publish(None);
            Err(AuthError::SessionExpired.into())
        },
        Err(err) => Err(AuthError::from(err).into()),
    }
}
