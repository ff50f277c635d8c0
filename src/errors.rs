//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称与 HTTP 状态码。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - http_status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_pamp_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:expr)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum PampError {
            $($variant(String),)*
        }

        impl PampError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(PampError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PampError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn http_status(&self) -> StatusCode {
                match self {
                    $(PampError::$variant(_) => $status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(PampError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl PampError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PampError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_pamp_errors! {
    CacheConnection("E001", "Cache Connection Error", StatusCode::INTERNAL_SERVER_ERROR),
    DatabaseConfig("E002", "Database Configuration Error", StatusCode::INTERNAL_SERVER_ERROR),
    DatabaseConnection("E003", "Database Connection Error", StatusCode::INTERNAL_SERVER_ERROR),
    DatabaseOperation("E004", "Database Operation Error", StatusCode::INTERNAL_SERVER_ERROR),
    Validation("E005", "Validation Error", StatusCode::BAD_REQUEST),
    BadRequest("E006", "Bad Request", StatusCode::BAD_REQUEST),
    NotFound("E007", "Resource Not Found", StatusCode::NOT_FOUND),
    Forbidden("E008", "Forbidden", StatusCode::FORBIDDEN),
    Serialization("E009", "Serialization Error", StatusCode::INTERNAL_SERVER_ERROR),
    Authentication("E010", "Authentication Error", StatusCode::UNAUTHORIZED),
    Authorization("E011", "Authorization Error", StatusCode::FORBIDDEN),
    DirectoryService("E012", "Directory Service Error", StatusCode::BAD_GATEWAY),
    Notification("E013", "Notification Error", StatusCode::BAD_GATEWAY),
}

impl PampError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否属于调用方可修正的错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }
}

impl fmt::Display for PampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PampError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PampError {
    fn from(err: sea_orm::DbErr) -> Self {
        PampError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PampError {
    fn from(err: std::io::Error) -> Self {
        PampError::DatabaseConfig(err.to_string())
    }
}

impl From<serde_json::Error> for PampError {
    fn from(err: serde_json::Error) -> Self {
        PampError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for PampError {
    fn from(err: reqwest::Error) -> Self {
        PampError::DirectoryService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PampError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PampError::cache_connection("test").code(), "E001");
        assert_eq!(PampError::database_operation("test").code(), "E004");
        assert_eq!(PampError::validation("test").code(), "E005");
        assert_eq!(PampError::forbidden("test").code(), "E008");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            PampError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(PampError::validation("test").error_type(), "Validation Error");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(PampError::validation("x").http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(PampError::bad_request("x").http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(PampError::not_found("x").http_status(), StatusCode::NOT_FOUND);
        assert_eq!(PampError::forbidden("x").http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            PampError::authentication("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PampError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(PampError::forbidden("x").is_client_error());
        assert!(!PampError::directory_service("x").is_client_error());
    }

    #[test]
    fn test_db_error_keeps_message() {
        let err: PampError = sea_orm::DbErr::Custom("UNIQUE constraint failed".into()).into();
        assert_eq!(err.code(), "E004");
        assert!(err.message().contains("UNIQUE constraint failed"));
    }

    #[test]
    fn test_format_simple() {
        let err = PampError::bad_request("Grading scale is already validated");
        let formatted = err.format_simple();
        assert!(formatted.contains("Bad Request"));
        assert!(formatted.contains("already validated"));
    }
}
