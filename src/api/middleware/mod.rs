//! # 中间件

pub mod auth;
pub mod request_id;

pub use auth::auth;
pub use request_id::{RequestId, request_id_middleware};
