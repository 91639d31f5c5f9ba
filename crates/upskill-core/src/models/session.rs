//! Session domain model.

use serde::{Deserialize, Serialize};

use super::organization::OrganizationMembership;
use super::user::User;

/// The identity of the current client session.
///
/// `token` and `user` are only meaningful together; a session holding
/// just one of them is not authenticated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    /// Recomputed on every call, never cached.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Bearer token, only when the session is fully authenticated.
    pub fn bearer(&self) -> Option<&str> {
        if self.is_authenticated() {
            self.token.as_deref()
        } else {
            None
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(User::display_name)
    }

    pub fn organization_memberships(&self) -> &[OrganizationMembership] {
        self.user
            .as_ref()
            .map(|u| u.organizations.as_slice())
            .unwrap_or(&[])
    }
}
