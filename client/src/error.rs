use reqwest::StatusCode;
use serde_json::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

const GENERIC_MESSAGE: &str = "Something went wrong, please try again";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unexpected_status status={status}")]
    Status { status: StatusCode, body: String },
    #[error("http_error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid_payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid_base_url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(error) => error.status(),
            Error::Json(_) | Error::InvalidBaseUrl(_) => None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.status().is_some_and(is_auth_failure)
    }

    /// Message to show the user: the server supplied `message` (or `error`)
    /// when there is one, a generic text otherwise.
    pub fn user_message(&self) -> String {
        let Error::Status { body, .. } = self else {
            return GENERIC_MESSAGE.to_owned();
        };
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|payload| {
                ["message", "error"].iter().find_map(|key| {
                    payload
                        .get(*key)
                        .and_then(Value::as_str)
                        .filter(|text| !text.trim().is_empty())
                        .map(str::to_owned)
                })
            })
            .unwrap_or_else(|| GENERIC_MESSAGE.to_owned())
    }
}

pub(crate) fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
