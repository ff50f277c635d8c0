use super::entities::ProjectDetail;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 项目列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct ProjectListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<ProjectDetail>,
}
