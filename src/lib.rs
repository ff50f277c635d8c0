//! PAMP - 学生项目管理平台后端服务
//!
//! 基于 Actix Web 构建，负责项目、分组、学生批次与评分表的管理。
//!
//! # 架构
//! - `cache`: 身份缓存（Moka）
//! - `clients`: 外部服务客户端（用户目录、邮件通知）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数与分组算法

pub mod cache;
pub mod clients;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
