//! # 登录流程模块

pub mod gateway;

pub use gateway::{LoginOutcome, ProviderGateway};
