use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 项目分组
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct ProjectGroup {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    // 成员按加入顺序排列
    pub members: Vec<Uuid>,
    pub report_submitted: bool,
    pub report_submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的分组（名称 + 有序成员）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub members: Vec<Uuid>,
}
