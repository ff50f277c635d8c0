//! 配置管理模块
//!
//! 配置来源按优先级递增：内置默认值、`config.toml`、`config.{APP_ENV}.toml`、
//! `PAMP_` 前缀环境变量、常用环境变量（`DATABASE_URL` 等）。

mod r#impl;
mod structs;

pub use structs::*;
