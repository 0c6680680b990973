use serde::{Deserialize, Serialize};

use crate::UserId;

/// Caller identity confirmed by the identity provider for one bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    user_id: UserId,
    email: Option<String>,
}

impl VerifiedUser {
    /// Creates a verified identity from identity-provider data.
    #[must_use]
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self { user_id, email }
    }

    /// Returns the stable user identifier issued by the identity provider.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
