// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors returned by the sync server and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures a request can end in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict {0} is already resolved")]
    AlreadyResolved(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("missing or invalid access token")]
    Unauthorized,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::AlreadyResolved(_) => StatusCode::CONFLICT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<docsync_core::Error> for ServerError {
    fn from(e: docsync_core::Error) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type for server state operations.
pub type Result<T> = std::result::Result<T, ServerError>;
