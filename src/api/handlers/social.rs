//! # 社交登录处理器

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use super::UserResponse;
use crate::api::middleware::RequestId;
use crate::api::response;
use crate::api::server::AppState;
use crate::auth::ACCESS_TOKEN_HEADER;
use crate::error::AppError;
use crate::oauth::CallbackParams;

/// `GET /login/{provider}`：302 跳转到提供商授权页
pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match state.gateway.initiate_login(&provider, &request_id) {
        Ok(target) => match HeaderValue::from_str(target.as_str()) {
            Ok(location) => (StatusCode::FOUND, [(LOCATION, location)]).into_response(),
            Err(e) => response::app_error(AppError::internal_with_source("授权地址无效", e)),
        },
        Err(e) => response::app_error(e),
    }
}

/// `GET /login/{provider}/callback`：返回用户信息，凭证放在 `Access-Token` 头
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let outcome = match state
        .gateway
        .handle_callback(&provider, &params, &request_id)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return response::app_error(e),
    };

    let token = match HeaderValue::from_str(outcome.credential.as_str()) {
        Ok(token) => token,
        Err(e) => return response::app_error(AppError::internal_with_source("凭证格式无效", e)),
    };

    let mut response = response::success_with_message(UserResponse::from(outcome.user), "登录成功");
    response.headers_mut().insert(ACCESS_TOKEN_HEADER, token);
    response
}
