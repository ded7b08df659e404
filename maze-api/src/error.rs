//! Maps dispatcher and store failures onto HTTP status codes.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use maze_core::SolutionStatus;
use maze_dispatch::{DispatchError, StoreError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing X-Owner-Id header")]
    MissingOwner,
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("maze not found")]
    NotFound,
    #[error("maze does not belong to this owner")]
    Forbidden,
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingOwner | AppError::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Dispatch(e) => dispatch_status(e),
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

fn dispatch_status(error: &DispatchError) -> StatusCode {
    match error {
        DispatchError::AlreadyProcessing => StatusCode::CONFLICT,
        DispatchError::TooManyInFlight => StatusCode::TOO_MANY_REQUESTS,
        DispatchError::StillProcessing => StatusCode::INTERNAL_SERVER_ERROR,
        DispatchError::MaxTooComplex => StatusCode::UNPROCESSABLE_ENTITY,
        DispatchError::InvalidMaze(status) => invalid_status_code(*status),
        DispatchError::SystemFail => StatusCode::INTERNAL_SERVER_ERROR,
        DispatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn invalid_status_code(status: SolutionStatus) -> StatusCode {
    match status {
        SolutionStatus::SystemFail => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
