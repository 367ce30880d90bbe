//! Graph session
//!
//! Holds the bearer token, the acting-user identity and the source mailbox for
//! one connection.
//! Created by [`GraphSession::connect`]; nothing about the connection lives in
//! global state. Token acquisition and refresh happen outside this crate.

use anyhow::{Context, Result};
use log::{debug, info};

use super::api;
use crate::config::GraphCredentials;
use crate::transfer::TransferContext;

/// Graph API base URL
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// An authenticated Graph connection
pub struct GraphSession {
    access_token: String,
    acting_user: String,
    /// Mailbox items are moved out of
    mailbox: String,
    base_url: String,
}

impl std::fmt::Debug for GraphSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSession")
            .field("acting_user", &self.acting_user)
            .field("mailbox", &self.mailbox)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GraphSession {
    /// Connect to `mailbox` with the given credentials.
    ///
    /// Resolves the acting user via `/me` unless the credentials name one.
    pub fn connect(credentials: &GraphCredentials, mailbox: &str) -> Result<Self> {
        let base_url = credentials
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let acting_user = match &credentials.acting_user {
            Some(user) => user.clone(),
            None => Self::whoami(&base_url, &credentials.access_token)
                .context("Failed to resolve acting user; set acting_user for app-only tokens")?,
        };

        info!("Connected to {} for {} as {}", base_url, mailbox, acting_user);
        Ok(Self {
            access_token: credentials.access_token.clone(),
            acting_user,
            mailbox: mailbox.to_string(),
            base_url,
        })
    }

    /// Create a session without contacting the service
    pub fn with_identity(
        access_token: impl Into<String>,
        acting_user: impl Into<String>,
        mailbox: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            acting_user: acting_user.into(),
            mailbox: mailbox.into(),
            base_url: base_url.into(),
        }
    }

    fn whoami(base_url: &str, access_token: &str) -> Result<String> {
        let url = format!("{}/me?$select=userPrincipalName,mail", base_url);
        let mut response = ureq::get(&url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .call()
            .context("Failed to send /me request")?;

        let user: api::User = response
            .body_mut()
            .read_json()
            .context("Failed to parse /me response")?;

        user.mail
            .filter(|m| !m.is_empty())
            .or(user.user_principal_name)
            .context("Signed-in user has neither mail nor userPrincipalName")
    }

    pub fn acting_user(&self) -> &str {
        &self.acting_user
    }

    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }

    /// Context for a transfer out of this session's mailbox
    pub fn transfer_context(&self) -> TransferContext {
        TransferContext::new(&self.mailbox, &self.acting_user)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value of the Authorization header
    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// End the session
    pub fn disconnect(self) {
        debug!("Disconnected from {} for {}", self.base_url, self.mailbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_with_configured_identity() {
        let credentials = GraphCredentials {
            access_token: "secret-token".to_string(),
            acting_user: Some("admin@example.com".to_string()),
            base_url: Some("http://localhost:9/v1.0/".to_string()),
        };

        let session = GraphSession::connect(&credentials, "alice@example.com").unwrap();

        assert_eq!(session.acting_user(), "admin@example.com");
        assert_eq!(session.base_url(), "http://localhost:9/v1.0");
        assert_eq!(
            session.transfer_context(),
            TransferContext::new("alice@example.com", "admin@example.com")
        );
        assert!(!format!("{:?}", session).contains("secret-token"));
    }
}
