// ── Identity ──
//
// The identity provider is an external collaborator behind the
// `IdentityProvider` trait. Two pieces connect it to the stores:
//
// - the identity bridge, a background task forwarding every auth-state
//   report into the session store (provider -> store, never the reverse);
// - `AuthService`, which validates forms, calls the provider, and turns
//   provider error codes into messages on the session store.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::UserIdentity;
use crate::store::{CatalogStore, SessionStore};
use crate::validation::{validate_login, validate_signup};

/// Shared demo account used by "continue as guest".
pub const GUEST_EMAIL: &str = "guest@netflixgpt.com";
pub const GUEST_PASSWORD: &str = "Guest@123";

const FALLBACK_MESSAGE: &str = "An error occurred. Please try again";

// ── Provider contract ────────────────────────────────────────────────

/// Error reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Provider error code, e.g. `auth/user-not-found`.
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Third-party sign-in used by the federated flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FederatedProvider {
    Google,
    Github,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, ProviderError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<UserIdentity, ProviderError>;

    async fn sign_in_anonymously(&self) -> Result<UserIdentity, ProviderError>;

    async fn sign_in_federated(
        &self,
        provider: FederatedProvider,
    ) -> Result<UserIdentity, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Auth-state reports. The current value is the provider's latest
    /// known principal (`None` when signed out).
    fn subscribe(&self) -> watch::Receiver<Option<UserIdentity>>;
}

/// User-facing message for a provider error code.
pub fn provider_error_message(code: &str) -> &'static str {
    match code {
        "auth/user-not-found" => "No account found with this email",
        "auth/wrong-password" => "Incorrect password",
        "auth/invalid-credential" => "Invalid email or password",
        "auth/email-already-in-use" => "An account with this email already exists",
        "auth/weak-password" => "Password should be at least 6 characters",
        "auth/too-many-requests" => "Too many failed attempts. Please try again later",
        "auth/network-request-failed" => "Network error. Please check your connection",
        "auth/invalid-email" => "Invalid email address",
        "auth/user-disabled" => "This account has been disabled",
        "auth/operation-not-allowed" => "Operation not allowed. Please contact support",
        "auth/popup-closed-by-user" => "Sign-in popup was closed",
        _ => FALLBACK_MESSAGE,
    }
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        CoreError::Identity {
            message: provider_error_message(&err.code).to_owned(),
            code: Some(err.code),
        }
    }
}

// ── Identity bridge ──────────────────────────────────────────────────

fn apply_report(report: Option<UserIdentity>, session: &SessionStore, catalog: &CatalogStore) {
    if let Some(identity) = report {
        debug!(user = %identity.id, anonymous = identity.is_anonymous, "signed in");
        session.set_session(identity);
    } else {
        debug!("signed out");
        session.clear_session();
        catalog.clear_all();
    }
}

/// Forward auth-state reports into the session store until cancelled or
/// the provider drops its sender.
pub(crate) fn spawn_identity_bridge(
    mut reports: watch::Receiver<Option<UserIdentity>>,
    session: Arc<SessionStore>,
    catalog: Arc<CatalogStore>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let initial = reports.borrow_and_update().clone();
        apply_report(initial, &session, &catalog);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = reports.changed() => {
                    if changed.is_err() {
                        debug!("identity provider closed its channel");
                        break;
                    }
                    let report = reports.borrow_and_update().clone();
                    apply_report(report, &session, &catalog);
                }
            }
        }
        debug!("identity bridge stopped");
    })
}

// ── AuthService ──────────────────────────────────────────────────────

/// Sign-in, sign-up, and sign-out flows over an identity provider.
///
/// Successful calls do not write the identity themselves; the bridge
/// picks it up from the provider's subscription.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    session: Arc<SessionStore>,
    catalog: Arc<CatalogStore>,
}

impl AuthService {
    pub(crate) fn new(
        provider: Arc<dyn IdentityProvider>,
        session: Arc<SessionStore>,
        catalog: Arc<CatalogStore>,
    ) -> Self {
        Self {
            provider,
            session,
            catalog,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, CoreError> {
        let errors = validate_login(email, password);
        if !errors.is_valid() {
            return Err(CoreError::InvalidForm(errors));
        }
        let password = SecretString::from(password.to_owned());
        self.call(self.provider.sign_in_with_password(email, &password))
            .await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<UserIdentity, CoreError> {
        let errors = validate_signup(email, password, display_name);
        if !errors.is_valid() {
            return Err(CoreError::InvalidForm(errors));
        }
        let password = SecretString::from(password.to_owned());
        self.call(
            self.provider
                .sign_up(email, &password, display_name.trim()),
        )
        .await
    }

    pub async fn sign_in_federated(
        &self,
        provider: FederatedProvider,
    ) -> Result<UserIdentity, CoreError> {
        self.call(self.provider.sign_in_federated(provider)).await
    }

    /// Sign in with the shared demo account, falling back to an anonymous
    /// session when the demo account does not exist.
    pub async fn continue_as_guest(&self) -> Result<UserIdentity, CoreError> {
        self.begin();
        let password = SecretString::from(GUEST_PASSWORD.to_owned());
        let result = match self
            .provider
            .sign_in_with_password(GUEST_EMAIL, &password)
            .await
        {
            Err(e) if matches!(e.code.as_str(), "auth/user-not-found" | "auth/invalid-credential") => {
                info!(code = %e.code, "guest account unavailable; signing in anonymously");
                self.provider.sign_in_anonymously().await
            }
            other => other,
        };
        self.finish(result)
    }

    /// Sign out and drop cached catalog data immediately.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        let result = self.provider.sign_out().await;
        self.catalog.clear_all();
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                let err = CoreError::from(e);
                self.session.set_session_error(err.user_message());
                Err(err)
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn begin(&self) {
        self.session.clear_session_error();
        self.session.set_auth_check_pending(true);
    }

    fn finish(&self, result: Result<UserIdentity, ProviderError>) -> Result<UserIdentity, CoreError> {
        self.session.set_auth_check_pending(false);
        result.map_err(|e| {
            warn!(code = %e.code, "identity provider rejected request");
            let err = CoreError::from(e);
            self.session.set_session_error(err.user_message());
            err
        })
    }

    async fn call(
        &self,
        request: impl Future<Output = Result<UserIdentity, ProviderError>>,
    ) -> Result<UserIdentity, CoreError> {
        self.begin();
        let result = request.await;
        self.finish(result)
    }
}
