#[derive(thiserror::Error, Debug)]
pub enum FritzError {
    #[error("The FRITZ!Box URL is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Request to the FRITZ!Box failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("The FRITZ!Box answered {status} for {path}")]
    UnexpectedStatus { status: reqwest::StatusCode, path: String },
    #[error("Cannot decode the FRITZ!Box response: {0}")]
    Decode(#[from] quick_xml::DeError),
    #[error("The FRITZ!Box rejected the credentials (login blocked for {block_time}s)")]
    LoginRejected { block_time: u64 },
    #[error("No session established, login first")]
    NotLoggedIn,
    #[error("Unexpected system status format: {0:?}")]
    MalformedBoxInfo(String),
}

pub type Result<T, E = FritzError> = std::result::Result<T, E>;
