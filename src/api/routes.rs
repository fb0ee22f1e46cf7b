//! # 路由配置

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;

use super::handlers::{social, users};
use super::middleware::auth;
use super::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .merge(login_routes())
        .merge(user_routes(state.clone()))
        .with_state(state)
}

/// 社交登录路由
fn login_routes() -> Router<AppState> {
    Router::new()
        .route("/login/{provider}", get(social::login))
        .route("/login/{provider}/callback", get(social::callback))
}

/// 需要访问凭证的用户路由
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user", get(users::current_user))
        .route_layer(from_fn_with_state(state, auth))
}
