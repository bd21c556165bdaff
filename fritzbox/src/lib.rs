//! Client for the HTTP interfaces of AVM FRITZ!Box routers.
//!
//! Only what the exporter needs: the session id login, the smart home device list and the system status record.

#[macro_use]
extern crate tracing;

mod auth;
pub mod boxinfo;
mod error;
pub mod homeauto;

pub use auth::SessionId;
pub use boxinfo::BoxInfo;
pub use error::{
    FritzError,
    Result,
};
pub use homeauto::{
    Device,
    DeviceList,
};
pub use reqwest::StatusCode;

use auth::{
    challenge_response,
    SessionInfo,
    LOGIN_PATH,
};
use boxinfo::SYSTEM_STATUS_PATH;
use homeauto::HOMEAUTO_PATH;
use std::{
    future::Future,
    pin::Pin,
    time::Duration,
};
use url::Url;

pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The queries the exporter issues against a box.
///
/// Every call may fail independently. Queries issued before a successful [`DeviceClient::login`] fail.
pub trait DeviceClient: Send + Sync {
    /// Authenticate, replacing any previous session.
    fn login(&mut self) -> ClientFuture<'_, ()>;

    /// All smart home devices known to the box.
    fn list(&self) -> ClientFuture<'_, DeviceList>;

    /// Model, firmware and runtime of the box itself.
    fn box_info(&self) -> ClientFuture<'_, BoxInfo>;
}

#[derive(Clone, Debug)]
pub struct ConnectionOptions {
    pub url: String,
    pub username: String,
    pub password: String,
    pub skip_tls_verify: bool,
    pub request_timeout: Duration,
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// [`DeviceClient`] talking HTTP(S) to a real box.
#[derive(Debug)]
pub struct FritzBox {
    base_url: Url,
    username: String,
    password: String,
    http_client: reqwest::Client,
    sid: Option<SessionId>,
}

impl FritzBox {
    pub fn new(options: &ConnectionOptions) -> Result<Self> {
        let base_url = Url::parse(&options.url)?;
        debug!(url = %base_url, skip_tls_verify = options.skip_tls_verify, "Creating FRITZ!Box client");

        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.skip_tls_verify)
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            base_url,
            username: options.username.clone(),
            password: options.password.clone(),
            http_client,
            sid: None,
        })
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.sid.as_ref()
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = self.base_url.join(path)?;
        let response = self.http_client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FritzError::UnexpectedStatus {
                status,
                path: path.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    fn sid(&self) -> Result<&str> {
        self.sid.as_ref().map(SessionId::as_str).ok_or(FritzError::NotLoggedIn)
    }

    async fn fetch_session_id(&self) -> Result<SessionId> {
        let challenge = SessionInfo::parse(&self.get_text(LOGIN_PATH, &[]).await?)?;
        let response = challenge_response(challenge.challenge(), &self.password);

        let answer = self
            .get_text(
                LOGIN_PATH,
                &[("username", self.username.as_str()), ("response", response.as_str())],
            )
            .await?;
        SessionInfo::parse(&answer)?.into_session_id()
    }
}

impl DeviceClient for FritzBox {
    fn login(&mut self) -> ClientFuture<'_, ()> {
        Box::pin(async move {
            self.sid = None;
            let sid = self.fetch_session_id().await?;
            debug!(?sid, user = %self.username, "Logged in");
            self.sid = Some(sid);
            Ok(())
        })
    }

    fn list(&self) -> ClientFuture<'_, DeviceList> {
        Box::pin(async move {
            let sid = self.sid()?;
            let xml = self
                .get_text(HOMEAUTO_PATH, &[("switchcmd", "getdevicelistinfos"), ("sid", sid)])
                .await?;
            DeviceList::parse(&xml)
        })
    }

    fn box_info(&self) -> ClientFuture<'_, BoxInfo> {
        Box::pin(async move {
            let sid = self.sid()?;
            let page = self.get_text(SYSTEM_STATUS_PATH, &[("sid", sid)]).await?;
            BoxInfo::parse(&page)
        })
    }
}
