// Frozen facts of the G.hn bridge web-panel protocol.
//
// Paths, form field names, status-blob keys, and the login digest all
// come from the device firmware's web frontend. None of these are
// tunables; changing any of them breaks interop with the device.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Status dump resource, served over plain HTTP on the default port.
pub const STATUS_PATH: &str = "/assets/data.cfl";

/// Session cookie attribute name in `Set-Cookie` / `Cookie` headers.
pub const SESSION_COOKIE_NAME: &str = "SESSIONID";

/// Status-blob key carrying the per-session CSRF token.
pub const CSRF_TOKEN_KEY: &str = "CSRFTOKEN";

/// Status-blob key flagging an authorized session after login.
pub const AUTHORIZED_KEY: &str = "WEB.SESSION.AUTHORIZED";

/// Truthy marker for [`AUTHORIZED_KEY`].
pub const AUTHORIZED_TRUE: &str = "1";

// ── Form fields (POST to the device root) ───────────────────────────

/// Login form field carrying the salted password digest.
pub const PASSWD_HASH_FIELD: &str = ".PASSWD_HASH";

/// Form field carrying the CSRF token on every state-changing request.
pub const CSRF_TOKEN_FIELD: &str = ".CSRFTOKEN";

/// Form field that triggers a hardware reset when set to `1`.
pub const HW_RESET_FIELD: &str = "SYSTEM.GENERAL.HW_RESET";

// ── Status-blob keys consumed by the quality analyzer ───────────────

pub const DEVICE_NAME_KEY: &str = "SYSTEM.PRODUCTION.DEVICE_NAME";
pub const UPTIME_KEY: &str = "SYSTEM.GENERAL.UPTIME";

/// This adapter's own device id within the G.hn domain.
pub const DEVICE_DID_KEY: &str = "GHN.GENERAL.DEVICE_DID";

/// Device id of the elected domain master.
pub const DM_DID_KEY: &str = "GHN.GENERAL.DM_DID";

/// Comma-separated per-link device id list; indexes align with the
/// RX/TX rate lists and the MAC list below.
pub const DIDS_KEY: &str = "DIDMNG.GENERAL.DIDS";
pub const MACS_KEY: &str = "DIDMNG.GENERAL.MACS";
pub const RX_BPS_KEY: &str = "DIDMNG.GENERAL.RX_BPS";
pub const TX_BPS_KEY: &str = "DIDMNG.GENERAL.TX_BPS";

/// How often this node lost its domain master.
pub const DM_LOST_KEY: &str = "GHN.COUNTERS.DM_LOST";

/// How often the medium-access map went missing.
pub const MAP_LOST_KEY: &str = "GHN.COUNTERS.MAP_LOST";

// ── Login digest ─────────────────────────────────────────────────────

/// Compute the login password digest the firmware's frontend computes:
///
/// `SHA256_hex( csrf_token_bytes ++ SHA256_raw(password) )`
///
/// The token bytes are hashed first, followed by the *raw* (not hex)
/// inner password digest. The result is lowercase hex. The order and
/// the raw inner digest are load-bearing; the device compares against
/// exactly this construction.
pub fn password_hash(csrf_token: &str, password: &SecretString) -> String {
    let inner = Sha256::digest(password.expose_secret().as_bytes());

    let mut outer = Sha256::new();
    outer.update(csrf_token.as_bytes());
    outer.update(inner);

    let digest = outer.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_lowercase_hex_of_expected_length() {
        let pw = SecretString::from("secret".to_owned());
        let hash = password_hash("tok123", &pw);

        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash.to_lowercase());
    }

    #[test]
    fn hash_matches_token_then_raw_inner_digest() {
        // Pin the construction: token bytes first, then the raw inner
        // digest (not its hex rendering).
        let pw = SecretString::from("hunter2".to_owned());
        let token = "a1b2c3";

        let inner = Sha256::digest(b"hunter2");
        let mut outer = Sha256::new();
        outer.update(token.as_bytes());
        outer.update(inner);
        let expected: String = outer
            .finalize()
            .iter()
            .fold(String::new(), |mut acc, byte| {
                let _ = write!(acc, "{byte:02x}");
                acc
            });

        assert_eq!(password_hash(token, &pw), expected);
    }

    #[test]
    fn hash_depends_on_token() {
        let pw = SecretString::from("same-password".to_owned());
        assert_ne!(password_hash("token-a", &pw), password_hash("token-b", &pw));
    }
}
