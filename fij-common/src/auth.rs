//! Session token derivation for the single-password gate
//!
//! The journal has exactly one secret (the configured password) and exactly one
//! session cookie. The cookie value is derived deterministically from the
//! secret:
//!
//! ```text
//! ses_<hex(HMAC-SHA256(key = password, message = SESSION_LABEL))>
//! ```
//!
//! Every successful login therefore yields the same token, and changing the
//! password invalidates every outstanding cookie.
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies here; cookie plumbing and the middleware
//! live in fij-server.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "fi-session";

/// Cookie lifetime: 30 days
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Prefix carried by every session token
const TOKEN_PREFIX: &str = "ses_";

/// Message authenticated by the session MAC
const SESSION_LABEL: &[u8] = b"fi-journal:session:v1";

/// Fixed key for login comparisons; the secrets go in the message, never the
/// key, since HMAC zero-pads keys and would equate "pw" with "pw\0"
const LOGIN_KEY: &[u8] = b"fi-journal:login:v1";

/// Authentication configuration
///
/// `Disabled` is an explicit state: with no password configured every request
/// passes the gate and the login endpoint reports a server-side error.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// No password configured (open mode)
    Disabled,
    /// Single shared password
    Password(String),
}

impl AuthMode {
    /// Build from an optional configured password; empty means disabled
    pub fn from_password(password: Option<&str>) -> Self {
        match password {
            Some(p) if !p.is_empty() => AuthMode::Password(p.to_string()),
            _ => AuthMode::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AuthMode::Password(_))
    }
}

impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Disabled => write!(f, "Disabled"),
            AuthMode::Password(_) => write!(f, "Password(<redacted>)"),
        }
    }
}

fn session_mac(password: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(password.as_bytes())
        .map_err(|e| Error::Internal(format!("Failed to initialize HMAC: {}", e)))?;
    mac.update(SESSION_LABEL);
    Ok(mac)
}

/// Derive the session token for a password
pub fn session_token(password: &str) -> Result<String> {
    let digest = session_mac(password)?.finalize().into_bytes();
    Ok(format!("{}{}", TOKEN_PREFIX, hex::encode(digest)))
}

/// Check a presented token against the password (constant-time compare)
///
/// Malformed tokens are simply invalid, never an error.
pub fn verify_session_token(password: &str, token: &str) -> Result<bool> {
    let Some(encoded) = token.strip_prefix(TOKEN_PREFIX) else {
        return Ok(false);
    };
    let Ok(provided) = hex::decode(encoded) else {
        return Ok(false);
    };

    Ok(session_mac(password)?.verify_slice(&provided).is_ok())
}

fn login_mac(secret: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(LOGIN_KEY)
        .map_err(|e| Error::Internal(format!("Failed to initialize HMAC: {}", e)))?;
    mac.update(secret.as_bytes());
    Ok(mac)
}

/// Check a login attempt against the configured password
///
/// Both strings are MACed under one fixed key and the digests compared in
/// constant time.
pub fn verify_password(password: &str, candidate: &str) -> Result<bool> {
    let presented = login_mac(candidate)?.finalize().into_bytes();
    Ok(login_mac(password)?.verify_slice(&presented).is_ok())
}
