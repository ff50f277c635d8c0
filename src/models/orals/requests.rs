use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::errors::{PampError, Result};

/// 结束时间必须晚于开始时间
pub fn ensure_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end <= start {
        return Err(PampError::validation(
            "end_time must be later than start_time",
        ));
    }
    Ok(())
}

// 为分组安排答辩
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/oral.ts")]
pub struct CreateOralRequest {
    pub group_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CreateOralRequest {
    pub fn validate(&self) -> Result<()> {
        ensure_time_range(self.start_time, self.end_time)
    }
}

// 调整答辩时段；未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/oral.ts")]
pub struct UpdateOralRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_end_must_follow_start() {
        let start = Utc::now();
        let request = CreateOralRequest {
            group_id: Uuid::new_v4(),
            start_time: start,
            end_time: start,
        };
        assert!(matches!(request.validate(), Err(PampError::Validation(_))));

        let request = CreateOralRequest {
            end_time: start + Duration::minutes(20),
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_partial_update_body() {
        let request: UpdateOralRequest =
            serde_json::from_str(r#"{"end_time":"2026-06-12T10:30:00Z"}"#).expect("valid body");
        assert!(request.start_time.is_none());
        assert!(request.end_time.is_some());
    }
}
