// Device HTTP client
//
// Composes the transport and the auth session into the three operations
// the supervisor needs against one device endpoint: fetch status,
// authenticate, restart. Quality analysis lives in `plcwatch-core`; this
// crate stops at the parsed status blob.

use reqwest::header;
use secrecy::SecretString;
use tracing::debug;
use url::Url;

use crate::blob::StatusBlob;
use crate::error::Error;
use crate::protocol;
use crate::session::AuthSession;
use crate::transport::TransportConfig;

/// Client for one powerline bridge device.
pub struct DeviceClient {
    host: String,
    password: SecretString,
    base_url: Url,
    http: reqwest::Client,
    session: AuthSession,
}

impl DeviceClient {
    /// Create a client for a device reachable at `host` (name or IP,
    /// default HTTP port).
    pub fn new(
        host: &str,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}/"))?;
        let http = transport.build_client()?;
        let session = AuthSession::new(http.clone(), base_url.clone());

        Ok(Self {
            host: host.to_owned(),
            password,
            base_url,
            http,
            session,
        })
    }

    /// Create a client from a pre-built base URL and HTTP client.
    ///
    /// Used by tests to point at a mock server.
    pub fn with_base_url(
        base_url: Url,
        password: SecretString,
        http: reqwest::Client,
    ) -> Self {
        let host = base_url.host_str().unwrap_or_default().to_owned();
        let session = AuthSession::new(http.clone(), base_url.clone());
        Self {
            host,
            password,
            base_url,
            http,
            session,
        }
    }

    /// The device host this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The session state owned by this client.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// GET the raw status payload, attaching the session cookie if one
    /// is held. Any non-success HTTP status is a [`Error::Device`].
    pub async fn fetch_raw_status(&self) -> Result<String, Error> {
        let url = self.base_url.join(protocol::STATUS_PATH)?;
        debug!(host = %self.host, "GET {url}");

        let mut request = self.http.get(url);
        if let Some(cookie) = self.session.cookie_header() {
            request = request.header(header::COOKIE, cookie);
        }

        let resp = request.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Device {
                status: status.as_u16(),
                message: "status fetch rejected".into(),
            });
        }

        resp.text().await.map_err(Error::Transport)
    }

    /// Fetch and parse the status blob.
    pub async fn fetch_status(&self) -> Result<StatusBlob, Error> {
        let raw = self.fetch_raw_status().await?;
        Ok(StatusBlob::parse(&raw))
    }

    /// Log in with the configured password, establishing a session.
    pub async fn authenticate(&mut self) -> Result<(), Error> {
        self.session.login(&self.password).await
    }

    /// Trigger a hardware reset.
    ///
    /// Requires an existing session cookie — without one this fails
    /// immediately, with no network call. The CSRF token is refreshed
    /// first (tokens may have expired since the last authenticated
    /// action), then the reset field is posted with the cookie attached.
    pub async fn restart(&mut self) -> Result<(), Error> {
        let Some(cookie) = self.session.cookie_header().map(ToOwned::to_owned) else {
            return Err(Error::Authentication {
                message: "no session cookie; authenticate before restarting".into(),
            });
        };

        self.session.fetch_token().await?;
        let token = self
            .session
            .csrf_token()
            .ok_or_else(|| Error::Authentication {
                message: "CSRF token missing after refresh".into(),
            })?
            .to_owned();

        let form = [
            (protocol::HW_RESET_FIELD, "1"),
            (protocol::CSRF_TOKEN_FIELD, token.as_str()),
        ];

        debug!(host = %self.host, "POST hardware reset");

        let resp = self
            .http
            .post(self.base_url.clone())
            .header(header::COOKIE, cookie)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Device {
                status: status.as_u16(),
                message: "restart request rejected".into(),
            });
        }

        Ok(())
    }
}
