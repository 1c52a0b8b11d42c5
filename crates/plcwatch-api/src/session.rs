// Device session authentication
//
// Owns the CSRF token and session cookie for one device and performs the
// challenge-response login handshake. The device treats tokens as
// freshness-critical: a token is fetched immediately before any request
// that could be rejected by a stale one (login, restart) and is read
// exactly once per login attempt.
//
// State machine: Unauthenticated → Authenticated → Unauthenticated (on
// failure or explicit invalidation); no other states. Session state is
// mutated only by this type's methods.

use std::collections::HashMap;

use reqwest::header;
use secrecy::SecretString;
use tracing::debug;
use url::Url;

use crate::blob::StatusBlob;
use crate::error::Error;
use crate::protocol;

/// CSRF token + session cookie state for one device.
pub struct AuthSession {
    http: reqwest::Client,
    base_url: Url,
    csrf_token: Option<String>,
    session_cookie: Option<String>,
    /// Other device-scoped `*TOKEN` values seen in the pre-login blob.
    capability_tokens: HashMap<String, String>,
}

impl AuthSession {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            csrf_token: None,
            session_cookie: None,
            capability_tokens: HashMap::new(),
        }
    }

    /// True iff both the CSRF token and the session cookie are present.
    ///
    /// This is a local-state check, not a round-trip validation: the
    /// device may still reject the cookie mid-cycle, which surfaces as an
    /// [`Error::Authentication`] on the next call.
    pub fn is_authenticated(&self) -> bool {
        self.csrf_token.is_some() && self.session_cookie.is_some()
    }

    /// The stored CSRF token, if any.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// The `Cookie` header value (`SESSIONID=<value>`) for the current
    /// session, if one was established.
    pub fn cookie_header(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    /// A device-scoped capability token captured during the last token
    /// fetch, by its blob key.
    pub fn capability_token(&self, key: &str) -> Option<&str> {
        self.capability_tokens.get(key).map(String::as_str)
    }

    /// Drop all session state, returning to Unauthenticated.
    pub fn invalidate(&mut self) {
        self.csrf_token = None;
        self.session_cookie = None;
        self.capability_tokens.clear();
    }

    /// Fetch a fresh CSRF token via an unauthenticated status request.
    ///
    /// Extracts `CSRFTOKEN` plus any other device-scoped `*TOKEN` keys
    /// from the blob. A non-success response or a blob without a token
    /// clears the stored token and reports the failure; it is never
    /// fatal to a polling loop.
    pub async fn fetch_token(&mut self) -> Result<(), Error> {
        let url = self.base_url.join(protocol::STATUS_PATH)?;
        debug!("fetching CSRF token from {url}");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            self.csrf_token = None;
            return Err(Error::Device {
                status: status.as_u16(),
                message: "token fetch rejected".into(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let blob = StatusBlob::parse(&body);

        let Some(token) = blob.get(protocol::CSRF_TOKEN_KEY) else {
            self.csrf_token = None;
            return Err(Error::Authentication {
                message: format!("status blob has no {} field", protocol::CSRF_TOKEN_KEY),
            });
        };
        self.csrf_token = Some(token.to_owned());

        self.capability_tokens = blob
            .iter()
            .filter(|(key, _)| key.ends_with("TOKEN") && *key != protocol::CSRF_TOKEN_KEY)
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();

        debug!("CSRF token stored");
        Ok(())
    }

    /// Perform the challenge-response login handshake.
    ///
    /// Always fetches a fresh token first — tokens are never reused
    /// across login attempts — then posts the salted password digest.
    /// Success requires HTTP 200, a `SESSIONID` cookie, *and* the
    /// authorized flag in the returned status blob; anything less leaves
    /// the session Unauthenticated.
    pub async fn login(&mut self, password: &SecretString) -> Result<(), Error> {
        self.fetch_token().await?;

        // Single token read per attempt: hash and form body both use
        // this snapshot, never a re-read.
        let token = self
            .csrf_token
            .clone()
            .ok_or_else(|| Error::Authentication {
                message: "CSRF token missing after fetch".into(),
            })?;

        let hash = protocol::password_hash(&token, password);
        let form = [
            (protocol::PASSWD_HASH_FIELD, hash.as_str()),
            (protocol::CSRF_TOKEN_FIELD, token.as_str()),
        ];

        debug!("logging in at {}", self.base_url);

        let resp = self
            .http
            .post(self.base_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            self.invalidate();
            return Err(Error::Authentication {
                message: format!("login rejected (HTTP {status})"),
            });
        }

        let Some(cookie) = extract_session_cookie(resp.headers()) else {
            self.invalidate();
            return Err(Error::Authentication {
                message: format!("login response carried no {} cookie", protocol::SESSION_COOKIE_NAME),
            });
        };

        // HTTP 200 alone is not success: the device answers 200 to bad
        // credentials too. The returned blob must carry the authorized flag.
        let body = resp.text().await.map_err(Error::Transport)?;
        let blob = StatusBlob::parse(&body);
        if blob.get(protocol::AUTHORIZED_KEY) != Some(protocol::AUTHORIZED_TRUE) {
            self.invalidate();
            return Err(Error::Authentication {
                message: "device did not report an authorized session".into(),
            });
        }

        self.session_cookie = Some(cookie);
        debug!("login successful");
        Ok(())
    }
}

/// Extract the session cookie from `Set-Cookie` headers by matching the
/// session-id attribute name, dropping cookie attributes. The returned
/// `NAME=value` pair is re-sent verbatim on subsequent requests.
fn extract_session_cookie(headers: &header::HeaderMap) -> Option<String> {
    for value in headers.get_all(header::SET_COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        let pair = raw.split(';').next().unwrap_or(raw).trim();
        if let Some((name, val)) = pair.split_once('=') {
            if name.trim() == protocol::SESSION_COOKIE_NAME {
                return Some(format!("{}={}", protocol::SESSION_COOKIE_NAME, val.trim()));
            }
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers_with(values: &[&str]) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        for v in values {
            headers.append(header::SET_COOKIE, v.parse().unwrap());
        }
        headers
    }

    #[test]
    fn extracts_session_cookie_and_strips_attributes() {
        let headers = headers_with(&["SESSIONID=abc123; Path=/; HttpOnly"]);
        assert_eq!(
            extract_session_cookie(&headers).as_deref(),
            Some("SESSIONID=abc123")
        );
    }

    #[test]
    fn ignores_other_cookies() {
        let headers = headers_with(&["LANG=en; Path=/", "SESSIONID=zzz"]);
        assert_eq!(
            extract_session_cookie(&headers).as_deref(),
            Some("SESSIONID=zzz")
        );
    }

    #[test]
    fn missing_session_cookie_yields_none() {
        let headers = headers_with(&["OTHER=1"]);
        assert_eq!(extract_session_cookie(&headers), None);
    }
}
