use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every API failure carries its exact client-facing message; the
/// detail endpoints historically used an "Error" key instead of "msg",
/// which clients depend on.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User ID is required")]
    UserIdRequired,
    #[error("User not found")]
    UserMissing,
    #[error("Planet doesn't exist")]
    PlanetMissing,
    #[error("People doesn't exist")]
    PeopleMissing,
    #[error("Favourite doesn't exist")]
    FavouriteMissing,
    #[error("There are no favourites")]
    NoFavourites,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UserIdRequired => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref error) = self {
            log::error!("request failed: {error:#}");
        }

        let status = self.status_code();
        let body = match self {
            ApiError::NotFound(_) => json!({ "Error": self.to_string() }),
            _ => json!({ "msg": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
