//! Route gate for the admin area.

use jiff::Timestamp;

use super::token::verify_token_at;

pub const LOGIN_PATH: &str = "/admin/login";

/// What to do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Send the visitor to this location (the login page)
    Redirect(String),
}

/// Guards every `/admin` path except the login page with a session cookie.
#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: Vec<u8>,
}

impl AdminGate {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Decides a request for `path` carrying the session `cookie`, if any.
    pub fn check(&self, path: &str, cookie: Option<&str>) -> GateDecision {
        self.check_at(path, cookie, Timestamp::now())
    }

    pub fn check_at(&self, path: &str, cookie: Option<&str>, now: Timestamp) -> GateDecision {
        let path = normalize_path(path);
        if !is_admin_path(path) || path == LOGIN_PATH {
            return GateDecision::Allow;
        }

        match cookie.map(|token| verify_token_at(token, &self.secret, now)) {
            Some(Ok(_)) => GateDecision::Allow,
            Some(Err(e)) => {
                log::debug!("Refusing admin session for {path}: {e}");
                GateDecision::Redirect(login_redirect(path))
            }
            None => GateDecision::Redirect(login_redirect(path)),
        }
    }
}

/// Strips trailing slashes, leaving the root alone.
fn normalize_path(path: &str) -> &str {
    if path == "/" {
        return path;
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

/// Login location that returns to `path` afterwards.
pub fn login_redirect(path: &str) -> String {
    format!("{LOGIN_PATH}?next={}", form_encode(path))
}

/// `application/x-www-form-urlencoded` encoding of one value.
fn form_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => {
                out.push(char::from(byte))
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{create_token, SessionPayload, SESSION_MAX_AGE_SECS};

    const SECRET: &[u8] = b"gate-secret";

    fn token(iat: i64) -> String {
        create_token(
            &SessionPayload {
                email: "admin@agency.example".into(),
                iat,
            },
            SECRET,
        )
        .unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::from_second(1_764_000_000).unwrap()
    }

    #[test]
    fn test_public_and_login_paths_pass() {
        let gate = AdminGate::new(SECRET);
        assert_eq!(gate.check_at("/", None, now()), GateDecision::Allow);
        assert_eq!(gate.check_at("/cliente/acme", None, now()), GateDecision::Allow);
        assert_eq!(gate.check_at("/admin/login", None, now()), GateDecision::Allow);
        assert_eq!(gate.check_at("/admin/login/", None, now()), GateDecision::Allow);
        assert_eq!(gate.check_at("/administrator", None, now()), GateDecision::Allow);
    }

    #[test]
    fn test_admin_paths_need_a_session() {
        let gate = AdminGate::new(SECRET);
        assert_eq!(
            gate.check_at("/admin/dashboard/", None, now()),
            GateDecision::Redirect("/admin/login?next=%2Fadmin%2Fdashboard".into())
        );
        assert_eq!(
            gate.check_at("/admin", Some("garbage"), now()),
            GateDecision::Redirect("/admin/login?next=%2Fadmin".into())
        );
    }

    #[test]
    fn test_valid_session_is_allowed() {
        let gate = AdminGate::new(SECRET);
        let cookie = token(now().as_second() - 60);
        assert_eq!(
            gate.check_at("/admin/clientes/acme", Some(&cookie), now()),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_expired_or_foreign_session_redirects() {
        let gate = AdminGate::new(SECRET);
        let stale = token(now().as_second() - SESSION_MAX_AGE_SECS - 1);
        assert!(matches!(
            gate.check_at("/admin/dashboard", Some(&stale), now()),
            GateDecision::Redirect(_)
        ));

        let other_gate = AdminGate::new(b"other".to_vec());
        let fresh = token(now().as_second());
        assert!(matches!(
            other_gate.check_at("/admin/dashboard", Some(&fresh), now()),
            GateDecision::Redirect(_)
        ));
    }

    #[test]
    fn test_form_encoding() {
        assert_eq!(form_encode("/admin/a b"), "%2Fadmin%2Fa+b");
        assert_eq!(form_encode("/admin/ação"), "%2Fadmin%2Fa%C3%A7%C3%A3o");
    }
}
