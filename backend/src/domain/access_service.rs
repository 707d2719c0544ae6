use log::{info, warn};
use shared::AuthUser;
use std::sync::Arc;

use crate::domain::errors::{RegistryError, RegistryResult};
use crate::storage::AuthProvider;

/// Service for session handling and the export privilege check
#[derive(Clone)]
pub struct AccessService {
    auth: Arc<dyn AuthProvider>,
    privileged_email: Option<String>,
}

impl AccessService {
    /// `privileged_email` is the single account allowed to export; `None`
    /// disables export for everyone
    pub fn new(auth: Arc<dyn AuthProvider>, privileged_email: Option<String>) -> Self {
        Self {
            auth,
            privileged_email: privileged_email.map(|email| email.trim().to_string()),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> RegistryResult<AuthUser> {
        self.auth.sign_in(email, password).await.map_err(|err| {
            warn!("Sign-in failed for {}: {}", email.trim(), err);
            RegistryError::remote(err)
        })
    }

    pub async fn current_user(&self) -> RegistryResult<Option<AuthUser>> {
        self.auth.current_user().await.map_err(RegistryError::remote)
    }

    pub async fn sign_out(&self) -> RegistryResult<()> {
        self.auth.sign_out().await.map_err(RegistryError::remote)
    }

    pub fn is_privileged(&self, user: &AuthUser) -> bool {
        self.privileged_email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(user.email.trim()))
    }

    /// Whether the current session may export; lookup failures count as no
    pub async fn can_export(&self) -> bool {
        match self.auth.current_user().await {
            Ok(Some(user)) => self.is_privileged(&user),
            Ok(None) => false,
            Err(err) => {
                warn!("Could not look up current user: {}", err);
                false
            }
        }
    }

    /// Fail unless the current session belongs to the privileged account
    pub async fn require_export(&self) -> RegistryResult<AuthUser> {
        let user = self.current_user().await?.ok_or(RegistryError::NotSignedIn)?;
        if !self.is_privileged(&user) {
            info!("Export refused for {}", user.email);
            return Err(RegistryError::ExportForbidden);
        }
        Ok(user)
    }
}
