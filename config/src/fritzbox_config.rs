use serde::Deserialize;
use std::{
    fmt,
    time::Duration,
};

/// Where and how to reach the FRITZ!Box.
///
/// The URL is kept as written in the config file. It is parsed when the session to the box is created, so a
/// malformed URL shows up as a failed scrape instead of preventing startup.
#[derive(Clone, Deserialize)]
pub struct FritzBoxConfig {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub skip_tls_verify: bool,
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub request_timeout: Duration,
}

impl fmt::Debug for FritzBoxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Avoid logging the password
        f.debug_struct("FritzBoxConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password_len", &self.password.len())
            .field("skip_tls_verify", &self.skip_tls_verify)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
