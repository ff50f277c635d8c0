use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 项目阶段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/step.ts")]
pub struct Step {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    pub has_mandatory_submission: bool,
    pub allow_submitting_after_deadline: bool,
    pub submission_deadline: Option<DateTime<Utc>>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}
