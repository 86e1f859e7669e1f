use crate::domain::fields::MissingFields;
use crate::domain::money::AmountOutOfRange;
use crate::domain::ports::TransportError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaysafecardError>;

/// Boxed low-level cause attached to an unpack failure.
pub type UnpackCause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PaysafecardError {
    #[error(transparent)]
    Configuration(#[from] MissingFields),
    #[error(transparent)]
    Amount(#[from] AmountOutOfRange),
    #[error("could not unpack {key} from response")]
    Unpack {
        key: String,
        #[source]
        source: Option<UnpackCause>,
    },
    #[error("authorization failed with {result_code}, error {error_code}")]
    Authorization { result_code: i64, error_code: i64 },
    #[error("capture failed with {result_code}, error {error_code}")]
    Capture { result_code: i64, error_code: i64 },
    #[error("status failed with {result_code}, error {error_code}")]
    Status { result_code: i64, error_code: i64 },
    #[error(transparent)]
    Transport(TransportError),
    #[error("config error: cannot read {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl PaysafecardError {
    pub(crate) fn unpack(key: impl Into<String>) -> Self {
        Self::Unpack {
            key: key.into(),
            source: None,
        }
    }

    pub(crate) fn unpack_with(key: impl Into<String>, cause: impl Into<UnpackCause>) -> Self {
        Self::Unpack {
            key: key.into(),
            source: Some(cause.into()),
        }
    }

    /// Result and error codes carried by a rejected remote call, if any.
    pub fn codes(&self) -> Option<(i64, i64)> {
        match self {
            Self::Authorization {
                result_code,
                error_code,
            }
            | Self::Capture {
                result_code,
                error_code,
            }
            | Self::Status {
                result_code,
                error_code,
            } => Some((*result_code, *error_code)),
            _ => None,
        }
    }
}

impl From<TransportError> for PaysafecardError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
