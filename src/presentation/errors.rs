// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use crate::utils::errors::RewriteError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<RewriteError>() {
            return match err {
                RewriteError::Validation(_) => StatusCode::BAD_REQUEST,
                RewriteError::TaskNotFound(_)
                | RewriteError::ContentNotFound(_)
                | RewriteError::ResultNotFound(_) => StatusCode::NOT_FOUND,
                RewriteError::AlreadyProcessing(_) | RewriteError::InvalidStateTransition(_) => {
                    StatusCode::CONFLICT
                }
                RewriteError::UnsupportedSource(_) => StatusCode::UNPROCESSABLE_ENTITY,
                RewriteError::SourceUnavailable(_) | RewriteError::UpstreamUnavailable(_) => {
                    StatusCode::BAD_GATEWAY
                }
                RewriteError::UnparseableResult(_) | RewriteError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
        }

        match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Some(RepositoryError::AlreadyExists) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
