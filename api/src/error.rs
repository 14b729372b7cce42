use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug)]
pub enum AppError {
    Database {
        error: diesel::result::Error,

        #[cfg(debug_assertions)]
        backtrace: Box<backtrace::Backtrace>,
    },
    Pool(diesel_async::pooled_connection::deadpool::PoolError),
    Upstream(reqwest::Error),
    Internal(eyre::Report),
    Message(String, StatusCode),
}

// Every endpoint renders the same body shape: `{"success": false, "error": …}`
// with a conventional status code. Debug builds additionally carry the
// crate-local backtrace frames for database errors.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,

    #[cfg(debug_assertions)]
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_info: Option<Value>,
}

impl ErrorResponse {
    fn new(error: String) -> Self {
        ErrorResponse {
            success: false,
            error,

            #[cfg(debug_assertions)]
            debug_info: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, body) = match self {
            AppError::Database {
                error: diesel::result::Error::NotFound,
                ..
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("not found".into()),
            ),
            AppError::Database {
                error,
                #[cfg(debug_assertions)]
                backtrace,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                #[cfg(debug_assertions)]
                {
                    let frames = filter_backtrace(&backtrace);
                    ErrorResponse {
                        success: false,
                        error: error.to_string(),
                        debug_info: serde_json::to_value(&frames).ok(),
                    }
                },
                #[cfg(not(debug_assertions))]
                {
                    tracing::error!(?error, "database error");
                    ErrorResponse::new("internal server error".into())
                },
            ),
            AppError::Pool(error) => {
                tracing::error!(?error, "database connection unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal server error".into()),
                )
            }
            AppError::Upstream(error) => {
                tracing::error!(?error, "upstream service call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("upstream service error".into()),
                )
            }
            AppError::Internal(report) => {
                tracing::error!(?report, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal server error".into()),
                )
            }
            AppError::Message(msg, status) => (status, ErrorResponse::new(msg)),
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        AppError::Database {
            error,

            #[cfg(debug_assertions)]
            backtrace: Box::new(backtrace::Backtrace::new()),
        }
    }
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for AppError {
    fn from(e: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        AppError::Pool(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e)
    }
}

impl From<eyre::Report> for AppError {
    fn from(e: eyre::Report) -> Self {
        AppError::Internal(e)
    }
}

// Bare string errors out of handlers are input problems, not server ones.
impl From<&'static str> for AppError {
    fn from(e: &'static str) -> Self {
        AppError::Message(e.into(), StatusCode::BAD_REQUEST)
    }
}

impl From<(&'static str, StatusCode)> for AppError {
    fn from((e, status): (&'static str, StatusCode)) -> Self {
        AppError::Message(e.into(), status)
    }
}

impl From<(String, StatusCode)> for AppError {
    fn from((e, status): (String, StatusCode)) -> Self {
        AppError::Message(e, status)
    }
}

#[cfg(debug_assertions)]
#[derive(Serialize, Debug)]
struct FrameInfo {
    name: String,
    loc: String,
}

#[cfg(debug_assertions)]
fn filter_backtrace(backtrace: &backtrace::Backtrace) -> Vec<FrameInfo> {
    const MODULE_PREFIX: &str = "terra_api::";
    let mut frames_info: Vec<FrameInfo> = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            if let (Some(name), Some(filename), Some(lineno)) = (
                symbol.name().map(|n| n.to_string()),
                symbol.filename().map(|f| f.to_owned()),
                symbol.lineno(),
            ) {
                if name.contains(MODULE_PREFIX) {
                    frames_info.push(FrameInfo {
                        name,
                        loc: format!("{}:{}", filename.to_string_lossy(), lineno),
                    });
                }
            }
        }
    }

    frames_info
}
