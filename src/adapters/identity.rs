//! Fixed-session [`IdentityPort`] adapter.
//!
//! The host has no sign-in flow of its own; the user id comes from the
//! command line, and its absence means "signed out".

use crate::app::ports::{IdentityPort, UserId};

#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserId>,
}

impl StaticIdentity {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self {
            user: Some(UserId::new(id)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, id: impl Into<String>) {
        self.user = Some(UserId::new(id));
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }
}

impl IdentityPort for StaticIdentity {
    fn identity(&self) -> Option<UserId> {
        self.user.clone()
    }
}
