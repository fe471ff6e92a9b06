//! Authenticity tokens for the submission form.
//!
//! Tokens are HMAC-SHA256 digests over a time bucket ("tick") and an action
//! name. A tick lasts half the configured lifetime, and a token is accepted
//! during its own tick and the one after, so it stays valid for between half
//! and the whole lifetime.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Action the calculator form's token is scoped to.
pub const SUBMISSION_ACTION: &str = "wpcc-nonce";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("authenticity token missing")]
    Missing,
    #[error("authenticity token invalid or expired")]
    Invalid,
}

/// Which tick a verified token was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAge {
    /// Issued in the current tick.
    Fresh,
    /// Issued in the previous tick.
    Aging,
}

/// Issues and verifies action-scoped tokens for anonymous callers.
#[derive(Clone)]
pub struct RequestGuard {
    secret: String,
    lifetime_secs: u64,
}

impl std::fmt::Debug for RequestGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGuard")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl RequestGuard {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: lifetime_secs.max(2),
        }
    }

    /// Guard with a random secret. Tokens will not survive a restart.
    pub fn with_random_secret(lifetime_secs: u64) -> Self {
        let secret: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();
        Self::new(secret, lifetime_secs)
    }

    /// Issue a token for `action` at the current time.
    pub fn create(&self, action: &str) -> String {
        self.create_at(action, unix_now())
    }

    /// Verify `token` for `action` at the current time.
    pub fn verify(&self, action: &str, token: Option<&str>) -> Result<TokenAge, GuardError> {
        self.verify_at(action, token, unix_now())
    }

    pub fn create_at(&self, action: &str, now_secs: u64) -> String {
        self.token_for_tick(action, self.tick(now_secs))
    }

    pub fn verify_at(
        &self,
        action: &str,
        token: Option<&str>,
        now_secs: u64,
    ) -> Result<TokenAge, GuardError> {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => {
                warn!(action = action, "nonce_missing");
                return Err(GuardError::Missing);
            }
        };

        let tick = self.tick(now_secs);

        if constant_time_compare(&self.token_for_tick(action, tick), token) {
            return Ok(TokenAge::Fresh);
        }

        if constant_time_compare(&self.token_for_tick(action, tick.saturating_sub(1)), token) {
            return Ok(TokenAge::Aging);
        }

        warn!(action = action, token_length = token.len(), "nonce_mismatch");
        Err(GuardError::Invalid)
    }

    fn tick(&self, now_secs: u64) -> u64 {
        now_secs.div_ceil(self.lifetime_secs / 2)
    }

    fn token_for_tick(&self, action: &str, tick: u64) -> String {
        // Anonymous caller: user id 0, no session.
        let data = format!("{tick}|{action}|0|");

        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(m) => m,
            Err(_) => {
                warn!("nonce_invalid_key");
                return String::new();
            }
        };
        mac.update(data.as_bytes());

        let digest = hex::encode(mac.finalize().into_bytes());
        let start = digest.len() - 12;
        digest[start..start + 10].to_string()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.is_empty() || a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;
    const NOW: u64 = 1_700_000_000;

    fn guard() -> RequestGuard {
        RequestGuard::new("test-secret", DAY)
    }

    #[test]
    fn test_token_shape() {
        let token = guard().create_at(SUBMISSION_ACTION, NOW);
        assert_eq!(token.len(), 10);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_fresh_token() {
        let g = guard();
        let token = g.create_at(SUBMISSION_ACTION, NOW);
        assert_eq!(
            g.verify_at(SUBMISSION_ACTION, Some(&token), NOW),
            Ok(TokenAge::Fresh)
        );
    }

    #[test]
    fn test_verify_aging_token() {
        let g = guard();
        let token = g.create_at(SUBMISSION_ACTION, NOW);
        let later = NOW + DAY / 2;
        assert_eq!(
            g.verify_at(SUBMISSION_ACTION, Some(&token), later),
            Ok(TokenAge::Aging)
        );
    }

    #[test]
    fn test_verify_expired_token() {
        let g = guard();
        let token = g.create_at(SUBMISSION_ACTION, NOW);
        assert_eq!(
            g.verify_at(SUBMISSION_ACTION, Some(&token), NOW + DAY + 1),
            Err(GuardError::Invalid)
        );
    }

    #[test]
    fn test_verify_missing_token() {
        let g = guard();
        assert_eq!(g.verify_at(SUBMISSION_ACTION, None, NOW), Err(GuardError::Missing));
        assert_eq!(
            g.verify_at(SUBMISSION_ACTION, Some("  "), NOW),
            Err(GuardError::Missing)
        );
    }

    #[test]
    fn test_token_scoped_to_action_and_secret() {
        let token = guard().create_at("other-action", NOW);
        assert_eq!(
            guard().verify_at(SUBMISSION_ACTION, Some(&token), NOW),
            Err(GuardError::Invalid)
        );

        let foreign = RequestGuard::new("other-secret", DAY).create_at(SUBMISSION_ACTION, NOW);
        assert_eq!(
            guard().verify_at(SUBMISSION_ACTION, Some(&foreign), NOW),
            Err(GuardError::Invalid)
        );
    }

    #[test]
    fn test_random_secret_guard_round_trip() {
        let g = RequestGuard::with_random_secret(DAY);
        let token = g.create(SUBMISSION_ACTION);
        assert!(g.verify(SUBMISSION_ACTION, Some(&token)).is_ok());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(!constant_time_compare("", ""));
    }
}
