//! Session manager: the single owner of "who is signed in".
//!
//! The manager is the only component that talks to the remote auth
//! service or writes to the token store. Everything else reads the
//! session through a [`SessionHandle`].

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};
use upskill_core::api::AuthApi;
use upskill_core::models::auth::{AuthResponse, SignInRequest, SignUpRequest};
use upskill_core::models::organization::{OrganizationMembership, OrganizationRole};
use upskill_core::models::session::Session;
use upskill_core::models::user::User;
use upskill_core::storage::KeyValueStore;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::store::TokenStore;
use crate::token;

/// Observable lifecycle of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Hydrating,
    Anonymous,
    Authenticated,
    /// A sign-in request is in flight.
    SigningIn,
    /// A sign-up request is in flight.
    SigningUp,
}

#[derive(Debug, Clone, Copy)]
enum Attempt {
    SignIn,
    SignUp,
}

#[derive(Debug)]
struct SessionState {
    session: Session,
    /// Last settled phase (never `SigningIn`/`SigningUp`).
    settled: SessionPhase,
    signing_in: usize,
    signing_up: usize,
}

impl SessionState {
    fn phase(&self) -> SessionPhase {
        if self.signing_up > 0 {
            SessionPhase::SigningUp
        } else if self.signing_in > 0 {
            SessionPhase::SigningIn
        } else {
            self.settled
        }
    }
}

/// Read-only view of the session, shared with every consumer.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<SessionState>>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> Session {
        self.state.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().session.is_authenticated()
    }

    /// Bearer token of a fully authenticated session.
    pub fn token(&self) -> Option<String> {
        self.state.read().session.bearer().map(str::to_string)
    }

    pub fn user(&self) -> Option<User> {
        let state = self.state.read();
        if state.session.is_authenticated() {
            state.session.user.clone()
        } else {
            None
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase()
    }

    /// `true` while hydrating or while any sign-in/sign-up is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase(),
            SessionPhase::Uninitialized
                | SessionPhase::Hydrating
                | SessionPhase::SigningIn
                | SessionPhase::SigningUp
        )
    }
}

/// Decrements the in-flight counter on drop, so an abandoned sign-in
/// future does not leave the session looking busy.
struct InFlight {
    state: Arc<RwLock<SessionState>>,
    attempt: Attempt,
}

impl InFlight {
    fn begin(state: &Arc<RwLock<SessionState>>, attempt: Attempt) -> Self {
        {
            let mut s = state.write();
            match attempt {
                Attempt::SignIn => s.signing_in += 1,
                Attempt::SignUp => s.signing_up += 1,
            }
        }
        Self {
            state: state.clone(),
            attempt,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut s = self.state.write();
        match self.attempt {
            Attempt::SignIn => s.signing_in = s.signing_in.saturating_sub(1),
            Attempt::SignUp => s.signing_up = s.signing_up.saturating_sub(1),
        }
    }
}

/// Session manager.
///
/// Generic over the auth service and the storage backend so that the
/// session logic has no dependency on HTTP or on the filesystem.
pub struct SessionManager<A: AuthApi, S: KeyValueStore> {
    api: A,
    store: TokenStore<S>,
    config: AuthConfig,
    state: Arc<RwLock<SessionState>>,
}

impl<A: AuthApi, S: KeyValueStore> SessionManager<A, S> {
    pub fn new(api: A, backend: S, config: AuthConfig) -> Self {
        Self {
            api,
            store: TokenStore::new(backend, &config),
            config,
            state: Arc::new(RwLock::new(SessionState {
                session: Session::default(),
                settled: SessionPhase::Uninitialized,
                signing_in: 0,
                signing_up: 0,
            })),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            state: self.state.clone(),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().session.is_authenticated()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase()
    }

    /// Restore the persisted session. Runs once; later calls return the
    /// current phase without touching storage.
    ///
    /// A persisted session is only adopted when both the token and the
    /// user are present and the token has not expired. Anything else is
    /// cleared from storage.
    pub fn hydrate(&self) -> SessionPhase {
        {
            let mut state = self.state.write();
            if state.settled != SessionPhase::Uninitialized {
                return state.phase();
            }
            state.settled = SessionPhase::Hydrating;
        }

        let token = self.store.get_token();
        let user = self.store.get_stored_user::<User>();

        let mut state = self.state.write();
        match (token, user) {
            (Some(token), Some(user)) if !token::is_token_expired(Some(&token)) => {
                info!(user_id = %user.id, "Restored persisted session");
                state.session = Session::authenticated(token, user);
                state.settled = SessionPhase::Authenticated;
            }
            (token, user) => {
                if token.is_some() || user.is_some() {
                    info!("Discarding expired or partial persisted session");
                }
                self.store.clear_auth_data();
                state.session = Session::default();
                state.settled = SessionPhase::Anonymous;
            }
        }
        state.phase()
    }

    /// Create an account in the default organization and sign in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        let _in_flight = InFlight::begin(&self.state, Attempt::SignUp);

        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            organization_name: self.config.default_organization_name.clone(),
            name: name.map(str::to_string),
        };

        match self.api.sign_up(request).await {
            Ok(response) => Ok(self.commit(response)),
            Err(e) => {
                let err = AuthError::from(e);
                warn!(error = %err, "Sign-up failed");
                Err(err)
            }
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let _in_flight = InFlight::begin(&self.state, Attempt::SignIn);

        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
            organization_name: self.config.default_organization_name.clone(),
        };

        match self.api.sign_in(request).await {
            Ok(response) => Ok(self.commit(response)),
            Err(e) => {
                let err = AuthError::from(e);
                warn!(error = %err, "Sign-in failed");
                Err(err)
            }
        }
    }

    /// Forget the session locally. Never fails, never calls the backend.
    pub fn sign_out(&self) {
        let mut state = self.state.write();
        self.store.clear_auth_data();
        if let Some(user_id) = state.session.user_id() {
            info!(user_id = %user_id, "Signed out");
        }
        state.session = Session::default();
        state.settled = SessionPhase::Anonymous;
    }

    /// Persist and adopt a successful auth response. Storage and memory
    /// are updated under one lock, so the last response to arrive wins
    /// in both places.
    fn commit(&self, response: AuthResponse) -> User {
        let AuthResponse {
            token,
            user,
            organization,
        } = response;

        let mut organizations = user.organizations;
        if organizations.is_empty() {
            let id = organization
                .as_ref()
                .and_then(|o| o.id.clone())
                .or_else(|| user.organization_id.clone())
                .unwrap_or_default();
            let name = organization
                .map(|o| o.name)
                .unwrap_or_else(|| self.config.default_organization_name.clone());
            organizations.push(OrganizationMembership {
                id,
                name,
                role: user.role.unwrap_or(OrganizationRole::Member),
            });
        }
        let organization_id = user
            .organization_id
            .or_else(|| organizations.first().map(|m| m.id.clone()))
            .filter(|id| !id.is_empty());

        let user = User {
            id: user.id,
            email: user.email,
            name: user.name,
            organization_id,
            organizations,
        };

        let mut state = self.state.write();
        self.store.set_token(&token);
        self.store.set_stored_user(&user);
        state.session = Session::authenticated(token, user.clone());
        state.settled = SessionPhase::Authenticated;

        info!(user_id = %user.id, organizations = user.organizations.len(), "Signed in");
        user
    }
}
