use serde::Deserialize;
use std::collections::HashSet;
use ts_rs::TS;
use uuid::Uuid;

use super::entities::BatchState;
use crate::errors::{PampError, Result};
use crate::utils::validate;

fn ensure_unique_students(students: &[Uuid]) -> Result<()> {
    let mut seen = HashSet::with_capacity(students.len());
    if let Some(dup) = students.iter().find(|id| !seen.insert(**id)) {
        return Err(PampError::validation(format!(
            "Student {dup} appears more than once in the roster"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student_batch.ts")]
pub struct CreateStudentBatchRequest {
    pub name: String,
    #[serde(default)]
    pub state: BatchState,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub students: Vec<Uuid>,
}

impl CreateStudentBatchRequest {
    pub fn validate(&self) -> Result<()> {
        validate::validate_name(&self.name)
            .map_err(|e| PampError::validation(format!("Batch name {e}")))?;
        ensure_unique_students(&self.students)
    }
}

// 修改批次；students 存在时整体替换名单
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student_batch.ts")]
pub struct UpdateStudentBatchRequest {
    pub name: Option<String>,
    pub state: Option<BatchState>,
    pub tags: Option<String>,
    pub students: Option<Vec<Uuid>>,
}

impl UpdateStudentBatchRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate::validate_name(name)
                .map_err(|e| PampError::validation(format!("Batch name {e}")))?;
        }
        if let Some(students) = &self.students {
            ensure_unique_students(students)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_students_rejected() {
        let id = Uuid::new_v4();
        let request = CreateStudentBatchRequest {
            name: "Promo 2026".into(),
            state: BatchState::Active,
            tags: String::new(),
            students: vec![id, Uuid::new_v4(), id],
        };
        let err = request.validate().expect_err("duplicate must fail");
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn test_state_defaults_to_active() {
        let request: CreateStudentBatchRequest =
            serde_json::from_str(r#"{"name":"Promo"}"#).expect("valid body");
        assert_eq!(request.state, BatchState::Active);
        assert!(request.students.is_empty());
    }
}
