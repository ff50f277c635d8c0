use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::PampError;
use crate::models::ErrorCode;

// 统一的 API 响应信封：{ code, message, data?, timestamp }
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 按错误类型生成带正确状态码的响应，`not_found` 指定资源缺失时的业务码
    pub fn from_error(err: &PampError, not_found: ErrorCode) -> HttpResponse {
        let code = match err {
            PampError::NotFound(_) => not_found,
            PampError::Validation(_) => ErrorCode::ValidationFailed,
            PampError::BadRequest(_) => ErrorCode::BadRequest,
            PampError::Forbidden(_) | PampError::Authorization(_) => ErrorCode::Forbidden,
            PampError::Authentication(_) => ErrorCode::Unauthorized,
            PampError::DirectoryService(_) | PampError::Notification(_) => {
                ErrorCode::UpstreamServiceError
            }
            _ => ErrorCode::InternalServerError,
        };
        HttpResponse::build(err.http_status()).json(Self::error_empty(code, err.message()))
    }
}
