//! 外部服务客户端
//!
//! - [`directory`]：用户目录服务，解析调用方身份、查询用户
//! - [`mailer`]：邮件通知 API，后台发送，失败只记录日志

pub mod directory;
pub mod mailer;

pub use directory::{HttpDirectory, UserDirectory};
pub use mailer::{EmailNotification, Mailer};
