//! # 认证中间件
//!
//! 从 `Authorization: Bearer` 或 `Access-Token` 头中提取访问凭证，
//! 验证后把用户信息注入到请求扩展中。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use super::RequestId;
use crate::api::server::AppState;
use crate::auth::{ACCESS_TOKEN_HEADER, AuthContext, extract_bearer_token};
use crate::error::{AppError, Result};
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};

/// 提取请求携带的访问凭证；非 Bearer 的 `Authorization` 头不妨碍读取 `Access-Token`
fn request_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token);

    bearer
        .or_else(|| {
            headers
                .get(ACCESS_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(ToString::to_string)
}

/// Axum认证中间件
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| "unknown".to_string(), ToString::to_string);

    let result = authenticate(&state, request.headers());
    let context = match result {
        Ok(context) => context,
        Err(e) => {
            ldebug!(
                request_id,
                LogStage::Authentication,
                LogComponent::Auth,
                "token_rejected",
                &format!("访问凭证校验失败: {e}")
            );
            return Err(e);
        }
    };

    request.extensions_mut().insert(Arc::new(context));
    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext> {
    let token = request_token(headers).ok_or_else(|| AppError::auth("Missing access token"))?;

    let claims = state.jwt.validate_token(&token)?;
    let user_id = claims
        .user_id()
        .map_err(|e| AppError::auth_with_source("Invalid access token", e))?;

    Ok(AuthContext { user_id })
}
