use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::errors::{PampError, Result};
use crate::utils::validate;

// 单个阶段；带 id 表示更新已有阶段
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/step.ts")]
pub struct UpsertStepRequest {
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub has_mandatory_submission: bool,
    #[serde(default)]
    pub allow_submitting_after_deadline: bool,
    pub submission_deadline: Option<DateTime<Utc>>,
}

// 整体提交项目阶段列表，未出现的阶段会被删除
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/step.ts")]
pub struct UpsertStepsRequest {
    pub steps: Vec<UpsertStepRequest>,
}

impl UpsertStepsRequest {
    pub fn validate(&self) -> Result<()> {
        for step in &self.steps {
            validate::validate_name(&step.name)
                .map_err(|e| PampError::validation(format!("Step name {e}")))?;
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
