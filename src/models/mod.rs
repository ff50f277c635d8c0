pub mod common;
pub mod grading;
pub mod groups;
pub mod identity;
pub mod orals;
pub mod projects;
pub mod steps;
pub mod student_batches;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

// 业务错误码
//
// 0 表示成功；1xxx 通用错误；2xxx 评分；3xxx 项目；4xxx 分组；5xxx 学生批次；6xxx 答辩
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    ValidationFailed = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    UpstreamServiceError = 1006,

    GradingScaleNotFound = 2000,
    GradingCriterionNotFound = 2001,
    GradingResultNotFound = 2002,
    GradingScaleLocked = 2003,
    GradingScaleNotValidatable = 2004,

    ProjectNotFound = 3000,
    ProjectAlreadyExists = 3001,

    GroupNotFound = 4000,
    ReportAlreadySubmitted = 4002,
    NotGroupMember = 4003,

    StudentBatchNotFound = 5000,
    StudentBatchAlreadyExists = 5001,

    OralNotFound = 6000,
    OralAlreadyExists = 6001,
}
