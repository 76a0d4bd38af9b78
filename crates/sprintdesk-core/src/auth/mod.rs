//! Admin session: login, signed tokens and the admin route gate.
//!
//! There is a single admin account, configured through `ADMIN_EMAIL`,
//! `ADMIN_PASSWORD` and `ADMIN_AUTH_SECRET`. A successful login yields a
//! token meant to be stored in the [`ADMIN_COOKIE_NAME`] cookie for
//! [`SESSION_MAX_AGE_SECS`].
//!
//! ```rust
//! use sprintdesk_core::auth::{AdminCredentials, AdminGate, GateDecision};
//!
//! let admin = AdminCredentials::new("admin@agency.example", "hunter2", "secret")?;
//! let token = admin.login(" Admin@Agency.example ", "hunter2")?;
//!
//! let gate = AdminGate::new(admin.secret());
//! assert_eq!(gate.check("/admin/dashboard", Some(&token)), GateDecision::Allow);
//! # Ok::<(), sprintdesk_core::auth::AuthError>(())
//! ```

use jiff::Timestamp;
use thiserror::Error;

pub mod gate;
pub mod token;

pub use gate::{login_redirect, AdminGate, GateDecision, LOGIN_PATH};
pub use token::{
    create_token, verify_token, verify_token_at, SessionPayload, TokenError,
    SESSION_MAX_AGE_SECS, TOKEN_VERSION,
};

/// Cookie the admin session token is stored in.
pub const ADMIN_COOKIE_NAME: &str = "alpha_admin";

/// Login and configuration failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing {0} configuration")]
    MissingConfig(&'static str),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// The configured admin account and signing secret.
#[derive(Clone)]
pub struct AdminCredentials {
    email: String,
    password: String,
    secret: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AdminCredentials {
    /// Builds the account; every value must be non-empty.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let credentials = Self {
            email: email.into(),
            password: password.into(),
            secret: secret.into(),
        };
        if credentials.email.trim().is_empty() {
            return Err(AuthError::MissingConfig("ADMIN_EMAIL"));
        }
        if credentials.password.is_empty() {
            return Err(AuthError::MissingConfig("ADMIN_PASSWORD"));
        }
        if credentials.secret.is_empty() {
            return Err(AuthError::MissingConfig("ADMIN_AUTH_SECRET"));
        }
        Ok(credentials)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// Checks the login form and issues a session token.
    ///
    /// The email is trimmed and compared case-insensitively; the password
    /// must match exactly.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.login_at(email, password, Timestamp::now())
    }

    pub fn login_at(
        &self,
        email: &str,
        password: &str,
        now: Timestamp,
    ) -> Result<String, AuthError> {
        let email = email.trim();
        if email.to_lowercase() != self.email.trim().to_lowercase() || password != self.password {
            log::warn!("Rejected admin login for '{email}'");
            return Err(AuthError::InvalidCredentials);
        }

        let payload = SessionPayload {
            email: email.to_string(),
            iat: now.as_second(),
        };
        Ok(create_token(&payload, self.secret())?)
    }

    /// Verifies a session token against this account's secret.
    pub fn verify(&self, token: &str) -> Result<SessionPayload, AuthError> {
        Ok(verify_token_at(token, self.secret(), Timestamp::now())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminCredentials {
        AdminCredentials::new("Admin@Agency.example", "s3cret!", "signing-key").unwrap()
    }

    #[test]
    fn test_login_is_case_insensitive_on_email_only() {
        let admin = admin();
        assert!(admin.login("admin@agency.example", "s3cret!").is_ok());
        assert_eq!(
            admin.login("admin@agency.example", "S3CRET!"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            admin.login("someone@agency.example", "s3cret!"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_token_carries_submitted_email_and_time() {
        let now = Timestamp::from_second(1_764_000_000).unwrap();
        let token = admin()
            .login_at(" admin@agency.example ", "s3cret!", now)
            .unwrap();

        let payload = verify_token(&token, b"signing-key").unwrap();
        assert_eq!(payload.email, "admin@agency.example");
        assert_eq!(payload.iat, 1_764_000_000);
    }

    #[test]
    fn test_missing_configuration() {
        assert_eq!(
            AdminCredentials::new("a@b", "pw", "").unwrap_err(),
            AuthError::MissingConfig("ADMIN_AUTH_SECRET")
        );
        assert_eq!(
            AdminCredentials::new(" ", "pw", "k").unwrap_err(),
            AuthError::MissingConfig("ADMIN_EMAIL")
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", admin());
        assert!(!rendered.contains("s3cret!"));
        assert!(!rendered.contains("signing-key"));
    }
}
