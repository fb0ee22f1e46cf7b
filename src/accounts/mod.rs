//! # 账号解析模块
//!
//! 以邮箱为唯一键，把外部身份映射到本地用户。

pub mod resolver;

pub use resolver::{AccountResolver, ResolvedAccount};
