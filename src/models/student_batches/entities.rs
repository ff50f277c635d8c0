use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 批次状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/student_batch.ts")]
pub enum BatchState {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchState::Active => f.write_str("active"),
            BatchState::Inactive => f.write_str("inactive"),
        }
    }
}

impl std::str::FromStr for BatchState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(BatchState::Active),
            "inactive" => Ok(BatchState::Inactive),
            _ => Err(format!("Invalid batch state: {s}")),
        }
    }
}

// 学生批次（一届/一个班的学生名单）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student_batch.ts")]
pub struct StudentBatch {
    pub id: Uuid,
    pub name: String,
    pub state: BatchState,
    pub tags: String,
    // 按加入顺序排列
    pub students: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
