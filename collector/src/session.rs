//! The authenticated session to the box.
//!
//! A session is created lazily on the first cycle and kept for the lifetime of the process. It is
//! re-authenticated at the start of every cycle since the box expires idle session ids after a few minutes.

use chrono::{
    DateTime,
    Utc,
};
use fritzbox_client::{
    ConnectionOptions,
    DeviceClient,
    FritzBox,
    FritzError,
};
use strum::Display;

/// Creates device clients. Creating one does not talk to the box yet.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn DeviceClient>, FritzError>;
}

/// [`Connector`] for a real box reachable over HTTP(S).
#[derive(Debug, Clone)]
pub struct FritzConnector {
    options: ConnectionOptions,
}

impl FritzConnector {
    pub fn new(options: ConnectionOptions) -> Self {
        Self { options }
    }
}

impl Connector for FritzConnector {
    fn connect(&self) -> Result<Box<dyn DeviceClient>, FritzError> {
        Ok(Box::new(FritzBox::new(&self.options)?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Failed to set up the FRITZ!Box client: {0}")]
    Setup(FritzError),

    #[error("Failed to log in to the FRITZ!Box: {0}")]
    Authentication(FritzError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

pub struct Session {
    client: Box<dyn DeviceClient>,
    state: AuthState,
    last_authenticated: Option<DateTime<Utc>>,
}

impl Session {
    fn new(client: Box<dyn DeviceClient>) -> Self {
        Self {
            client,
            state: AuthState::Unauthenticated,
            last_authenticated: None,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn last_authenticated(&self) -> Option<DateTime<Utc>> {
        self.last_authenticated
    }

    async fn authenticate(&mut self) -> Result<(), FritzError> {
        self.state = AuthState::Unauthenticated;
        self.client.login().await?;
        self.state = AuthState::Authenticated;
        self.last_authenticated = Some(Utc::now());
        Ok(())
    }
}

pub struct SessionManager {
    connector: Box<dyn Connector>,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Hand out a freshly authenticated client for one cycle.
    ///
    /// A session that was created in this call and failed to log in is discarded, so the next cycle
    /// starts from scratch. An existing session that failed to log in is kept for the next attempt. If
    /// the returned future is dropped while logging in, the session is discarded as well.
    pub async fn ensure(&mut self) -> Result<&dyn DeviceClient, ConnectError> {
        let (mut session, created) = match self.session.take() {
            Some(session) => (session, false),
            None => {
                debug!("Creating a new FRITZ!Box session");
                let client = self.connector.connect().map_err(ConnectError::Setup)?;
                (Session::new(client), true)
            }
        };

        match session.authenticate().await {
            Ok(()) => {
                trace!(state = %session.state(), "Session ready");
                Ok(self.session.insert(session).client.as_ref())
            }
            Err(err) => {
                if !created {
                    self.session = Some(session);
                }
                Err(ConnectError::Authentication(err))
            }
        }
    }
}
