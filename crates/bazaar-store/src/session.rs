//! # Session Synchronizer
//!
//! Keeps `current_user` in the snapshot consistent with the external
//! identity provider, across three channels: explicit login/register calls,
//! explicit logout, and the passive session-change subscription.
//!
//! ## Channels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Session Synchronizer                             │
//! │                                                                     │
//! │  login(email, pw)    register(name, email, pw)    logout()          │
//! │       │                      │                       │              │
//! │       ▼                      ▼                       ▼              │
//! │  verify_credentials    create_account           end_session         │
//! │       │                      │                       │              │
//! │       ▼                      ▼                       ▼              │
//! │  fetch_profile         create_profile           SetUser(None)       │
//! │       │                      │                  (regardless of      │
//! │       ▼                      ▼                   network outcome)   │
//! │  SetUser(user)          SetUser(user)                               │
//! │                                                                     │
//! │  PASSIVE CHANNEL (held for the process lifetime):                   │
//! │  SignedIn(session) ──► fetch_profile ──► SetUser(user)              │
//! │  SignedOut         ──────────────────► SetUser(None)                │
//! │                                                                     │
//! │  Races with explicit calls are harmless: SetUser replaces the       │
//! │  whole field, so the last event wins.                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Policy
//! Every failure becomes `state.error` data; `loading` is reset to false in
//! a final step regardless of outcome. Nothing here returns an error to the
//! caller. There is no timeout on individual provider calls: a hung call
//! leaves `loading = true` until it resolves.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use bazaar_core::{StoreEvent, User};

use crate::error::AuthError;
use crate::provider::{IdentityProvider, ProfileStore, ProviderSession, SessionChange};
use crate::store::Dispatcher;

// =============================================================================
// Session Synchronizer
// =============================================================================

/// Bridges the identity provider to the state model.
pub(crate) struct SessionSynchronizer {
    /// The provider, or `None` when unconfigured (auth actions then
    /// short-circuit with a configuration error before any network call).
    identity: Option<Arc<dyn IdentityProvider>>,

    /// The profile backend.
    profiles: Arc<dyn ProfileStore>,

    /// Event sink shared with the store facade.
    dispatcher: Dispatcher,
}

impl SessionSynchronizer {
    pub(crate) fn new(
        identity: Option<Arc<dyn IdentityProvider>>,
        profiles: Arc<dyn ProfileStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        SessionSynchronizer {
            identity,
            profiles,
            dispatcher,
        }
    }

    /// Explicit login.
    ///
    /// Sets loading, clears any prior error, verifies credentials, merges
    /// the provider identity with the profile record, and emits SetUser.
    /// On any failure `current_user` is left unchanged and the error is
    /// surfaced as data.
    pub(crate) async fn login(&self, email: &str, password: &str) {
        debug!(email = %email, "login");
        self.dispatcher.dispatch(StoreEvent::SetLoading(true)).await;
        self.dispatcher.dispatch(StoreEvent::SetError(None)).await;

        match self.try_login(email, password).await {
            Ok(user) => {
                self.dispatcher
                    .dispatch(StoreEvent::SetUser(Some(user)))
                    .await;
            }
            Err(err) => {
                self.dispatcher
                    .dispatch(StoreEvent::SetError(Some(err.to_string())))
                    .await;
            }
        }

        // Guaranteed final step, success or failure
        self.dispatcher.dispatch(StoreEvent::SetLoading(false)).await;
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let identity = self.identity.as_ref().ok_or(AuthError::NotConfigured)?;

        let session = identity.verify_credentials(email, password).await?;
        self.resolve_user(&session).await
    }

    /// Explicit registration: provider signup, then profile creation.
    ///
    /// If signup succeeds but profile creation fails, the session ends in
    /// an inconsistent state (signed up, no local profile). The error is
    /// surfaced, not silently repaired.
    pub(crate) async fn register(&self, name: &str, email: &str, password: &str) {
        debug!(email = %email, "register");
        self.dispatcher.dispatch(StoreEvent::SetLoading(true)).await;
        self.dispatcher.dispatch(StoreEvent::SetError(None)).await;

        match self.try_register(name, email, password).await {
            Ok(user) => {
                self.dispatcher
                    .dispatch(StoreEvent::SetUser(Some(user)))
                    .await;
            }
            Err(err) => {
                self.dispatcher
                    .dispatch(StoreEvent::SetError(Some(err.to_string())))
                    .await;
            }
        }

        self.dispatcher.dispatch(StoreEvent::SetLoading(false)).await;
    }

    async fn try_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let identity = self.identity.as_ref().ok_or(AuthError::NotConfigured)?;

        let session = identity.create_account(email, password).await?;

        let record = crate::provider::ProfileRecord {
            id: session.user_id.clone(),
            name: name.to_string(),
            email: session.email.clone(),
            is_admin: false,
            created_at: Utc::now(),
        };
        self.profiles.create_profile(record).await?;

        Ok(User {
            id: session.user_id,
            name: name.to_string(),
            email: session.email,
            is_admin: false,
        })
    }

    /// Explicit logout.
    ///
    /// The local session is cleared regardless of the sign-out call's
    /// network outcome: once the user asked to leave, they leave.
    pub(crate) async fn logout(&self) {
        debug!("logout");
        if let Some(identity) = self.identity.as_ref() {
            if let Err(err) = identity.end_session().await {
                warn!(error = %err, "end_session failed; clearing local session anyway");
            }
        }

        self.dispatcher.dispatch(StoreEvent::SetUser(None)).await;
    }

    /// Handles one passive session-change notification.
    pub(crate) async fn handle_session_change(&self, change: SessionChange) {
        match change {
            SessionChange::SignedIn(session) => {
                debug!(user_id = %session.user_id, "session change: signed in");
                match self.resolve_user(&session).await {
                    Ok(user) => {
                        self.dispatcher
                            .dispatch(StoreEvent::SetUser(Some(user)))
                            .await;
                    }
                    Err(err) => {
                        // Leave current_user untouched; surface the failure
                        self.dispatcher
                            .dispatch(StoreEvent::SetError(Some(err.to_string())))
                            .await;
                    }
                }
            }
            SessionChange::SignedOut => {
                debug!("session change: signed out");
                self.dispatcher.dispatch(StoreEvent::SetUser(None)).await;
            }
        }
    }

    /// Merges a provider session with its profile record into a `User`.
    async fn resolve_user(&self, session: &ProviderSession) -> Result<User, AuthError> {
        let profile = self
            .profiles
            .fetch_profile(&session.user_id)
            .await?
            .ok_or_else(|| AuthError::ProfileMissing(session.user_id.clone()))?;

        Ok(User {
            id: session.user_id.clone(),
            name: profile.name,
            email: session.email.clone(),
            is_admin: profile.is_admin,
        })
    }
}
