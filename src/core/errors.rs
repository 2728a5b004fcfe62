use actix_web::HttpResponse;
use std::fmt;

/// Failures raised by the persisted store adapter.
///
/// A missing key is `Ok(None)`, never an error. A `Parse` on load means the
/// stored blob is corrupt; callers surface it at startup instead of
/// recovering.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Parse {
        key: String,
        source: serde_json::Error,
    },
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "storage i/o failed: {}", err),
            StorageError::Parse { key, source } => {
                write!(f, "malformed snapshot under '{}': {}", key, source)
            }
            StorageError::UnsupportedVersion {
                key,
                found,
                supported,
            } => write!(
                f,
                "snapshot under '{}' has version {}, newest supported is {}",
                key, found, supported
            ),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Parse { source, .. } => Some(source),
            StorageError::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl From<ApiError> for HttpResponse {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::BadRequest(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({"error": msg}))
            }
            ApiError::Unauthorized => {
                HttpResponse::Unauthorized().json(serde_json::json!({"error": "Unauthorized"}))
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Wrapper that lets handlers bubble `anyhow` errors with `?`; anything that
/// escapes becomes an opaque 500.
pub struct AppError(anyhow::Error);

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self.0, "request failed");
        HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": "Internal server error"}))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError(err.into())
    }
}
