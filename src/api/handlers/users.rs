//! # 用户处理器

use std::sync::Arc;

use axum::{Extension, extract::State, response::Response};

use super::UserResponse;
use crate::api::response;
use crate::api::server::AppState;
use crate::auth::AuthContext;
use crate::error::AppError;

/// `GET /user`：当前凭证对应的用户
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
) -> Response {
    match state.gateway.resolver().find_by_id(auth.user_id).await {
        Ok(Some(user)) => response::success(UserResponse::from(user)),
        Ok(None) => response::app_error(AppError::not_found("user", auth.user_id.to_string())),
        Err(e) => response::app_error(e),
    }
}
