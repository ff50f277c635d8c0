use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use super::entities::{NotationMode, ResultTarget, ScaleType};
use crate::errors::{PampError, Result};
use crate::utils::validate;

// 创建评分标准请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct CreateGradingCriterionRequest {
    pub label: String,
    pub max_points: f64,
    pub weight: Option<f64>,
    #[serde(default)]
    pub comment_enabled: bool,
}

impl CreateGradingCriterionRequest {
    pub fn validate(&self) -> Result<()> {
        validate::validate_name(&self.label)
            .map_err(|e| PampError::validation(format!("Criterion label {e}")))?;
        validate::validate_max_points(self.max_points).map_err(PampError::validation)?;
        if let Some(weight) = self.weight {
            validate::validate_weight(weight).map_err(PampError::validation)?;
        }
        Ok(())
    }
}

// 创建评分表请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct CreateGradingScaleRequest {
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub scale_type: ScaleType,
    pub target_id: Uuid,
    pub notation_mode: NotationMode,
    pub title: String,
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub criteria: Vec<CreateGradingCriterionRequest>,
}

impl CreateGradingScaleRequest {
    pub fn validate(&self) -> Result<()> {
        if self.target_id.is_nil() {
            return Err(PampError::validation("targetId must be a valid UUID"));
        }
        validate::validate_name(&self.title)
            .map_err(|e| PampError::validation(format!("Title {e}")))?;
        for criterion in &self.criteria {
            criterion.validate()?;
        }
        Ok(())
    }
}

// 更新评分表请求（仅标题）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct UpdateGradingScaleRequest {
    pub title: Option<String>,
}

impl UpdateGradingScaleRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate::validate_name(title)
                .map_err(|e| PampError::validation(format!("Title {e}")))?;
        }
        Ok(())
    }
}

// 更新评分标准请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct UpdateGradingCriterionRequest {
    pub label: Option<String>,
    pub max_points: Option<f64>,
    pub weight: Option<f64>,
    pub comment_enabled: Option<bool>,
}

impl UpdateGradingCriterionRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(label) = &self.label {
            validate::validate_name(label)
                .map_err(|e| PampError::validation(format!("Criterion label {e}")))?;
        }
        if let Some(max_points) = self.max_points {
            validate::validate_max_points(max_points).map_err(PampError::validation)?;
        }
        if let Some(weight) = self.weight {
            validate::validate_weight(weight).map_err(PampError::validation)?;
        }
        Ok(())
    }
}

// 单条评分结果
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingResultItem {
    pub criterion_id: Uuid,
    pub score: f64,
    pub comment: Option<String>,
}

// 批量录入评分结果请求：同一批次共享一个评分对象
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct CreateGradingResultsRequest {
    pub target_group_id: Option<Uuid>,
    pub target_student_id: Option<Uuid>,
    pub results: Vec<GradingResultItem>,
}

impl CreateGradingResultsRequest {
    /// 解析评分对象，并校验每条分数
    pub fn validate(&self) -> Result<ResultTarget> {
        let target = match (self.target_group_id, self.target_student_id) {
            (Some(group_id), None) => ResultTarget::Group(group_id),
            (None, Some(student_id)) => ResultTarget::Student(student_id),
            (Some(_), Some(_)) => {
                return Err(PampError::validation(
                    "Only one of targetGroupId or targetStudentId may be set",
                ));
            }
            (None, None) => {
                return Err(PampError::validation(
                    "One of targetGroupId or targetStudentId is required",
                ));
            }
        };
        if self.results.is_empty() {
            return Err(PampError::validation("results must not be empty"));
        }
        for item in &self.results {
            validate::validate_score(item.score).map_err(PampError::validation)?;
        }
        Ok(target)
    }
}

// 更新评分结果请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct UpdateGradingResultRequest {
    pub score: Option<f64>,
    pub comment: Option<String>,
}

impl UpdateGradingResultRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(score) = self.score {
            validate::validate_score(score).map_err(PampError::validation)?;
        }
        Ok(())
    }
}

// 按项目查询评分表
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingScaleQuery {
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub scale_type: Option<ScaleType>,
    pub target_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(label: &str, max_points: f64, weight: Option<f64>) -> CreateGradingCriterionRequest {
        CreateGradingCriterionRequest {
            label: label.to_string(),
            max_points,
            weight,
            comment_enabled: false,
        }
    }

    #[test]
    fn test_criterion_validation() {
        assert!(criterion("Quality", 5.0, Some(0.3)).validate().is_ok());
        assert!(criterion("", 5.0, None).validate().is_err());
        assert!(criterion("Quality", 0.0, None).validate().is_err());
        assert!(criterion("Quality", 5.0, Some(1.5)).validate().is_err());
    }

    #[test]
    fn test_scale_request_requires_type_and_mode() {
        let json = r#"{"target_id":"8d0c6f7e-4f53-4a55-9b3e-2f0f3b0c8a11","title":"Deliverable 1"}"#;
        assert!(serde_json::from_str::<CreateGradingScaleRequest>(json).is_err());

        let json = r#"{
            "type": "deliverable",
            "target_id": "8d0c6f7e-4f53-4a55-9b3e-2f0f3b0c8a11",
            "notation_mode": "group",
            "title": "Deliverable 1"
        }"#;
        let request: CreateGradingScaleRequest = serde_json::from_str(json).expect("valid body");
        assert!(request.criteria.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_scale_request_rejects_bad_target_id() {
        let json = r#"{"type":"report","target_id":"nope","notation_mode":"group","title":"R"}"#;
        assert!(serde_json::from_str::<CreateGradingScaleRequest>(json).is_err());
    }

    #[test]
    fn test_results_request_needs_exactly_one_target() {
        let item = GradingResultItem {
            criterion_id: Uuid::new_v4(),
            score: 3.0,
            comment: None,
        };
        let both = CreateGradingResultsRequest {
            target_group_id: Some(Uuid::new_v4()),
            target_student_id: Some(Uuid::new_v4()),
            results: vec![item.clone()],
        };
        assert!(matches!(both.validate(), Err(PampError::Validation(_))));

        let none = CreateGradingResultsRequest {
            target_group_id: None,
            target_student_id: None,
            results: vec![item.clone()],
        };
        assert!(none.validate().is_err());

        let student = Uuid::new_v4();
        let ok = CreateGradingResultsRequest {
            target_group_id: None,
            target_student_id: Some(student),
            results: vec![item],
        };
        assert_eq!(ok.validate().ok(), Some(ResultTarget::Student(student)));
    }

    #[test]
    fn test_negative_score_rejected() {
        let request = CreateGradingResultsRequest {
            target_group_id: Some(Uuid::new_v4()),
            target_student_id: None,
            results: vec![GradingResultItem {
                criterion_id: Uuid::new_v4(),
                score: -1.0,
                comment: None,
            }],
        };
        assert!(request.validate().is_err());
    }
}
