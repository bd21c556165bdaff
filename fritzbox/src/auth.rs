//! Session ids via the AVM challenge-response login on `/login_sid.lua`.

use crate::error::{
    FritzError,
    Result,
};
use md5::{
    Digest as _,
    Md5,
};
use serde::Deserialize;
use std::fmt;

pub(crate) const LOGIN_PATH: &str = "/login_sid.lua";

const INVALID_SID: &str = "0000000000000000";

/// A session id handed out by the box. Only valid ones are ever constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Avoid logging the full sid
        write!(f, "SessionId({}…)", self.0.chars().take(4).collect::<String>())
    }
}

/// The `<SessionInfo>` document returned by every call to the login page.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionInfo {
    #[serde(rename = "SID")]
    sid: String,
    #[serde(rename = "Challenge")]
    challenge: String,
    #[serde(rename = "BlockTime", default)]
    block_time: u64,
}

impl SessionInfo {
    pub(crate) fn parse(xml: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    pub(crate) fn challenge(&self) -> &str {
        &self.challenge
    }

    /// The session id, or [`FritzError::LoginRejected`] when the box handed out the invalid all-zero sid.
    pub(crate) fn into_session_id(self) -> Result<SessionId> {
        if self.sid.is_empty() || self.sid == INVALID_SID {
            return Err(FritzError::LoginRejected {
                block_time: self.block_time,
            });
        }
        Ok(SessionId(self.sid))
    }
}

/// `<challenge>-<md5 of the UTF-16LE encoded "<challenge>-<password>">`.
///
/// The box hashes code points above 255 as `.`, so we do the same.
pub(crate) fn challenge_response(challenge: &str, password: &str) -> String {
    let secret = format!("{challenge}-{password}");
    let mut hasher = Md5::new();
    for unit in secret.chars().map(|c| if (c as u32) > 255 { '.' } else { c }) {
        hasher.update((unit as u16).to_le_bytes());
    }
    format!("{challenge}-{:x}", hasher.finalize())
}
