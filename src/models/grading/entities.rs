use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 评分表类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum ScaleType {
    Deliverable, // 交付物
    Report,      // 报告
    Defense,     // 答辩
}

impl ScaleType {
    pub const DELIVERABLE: &'static str = "deliverable";
    pub const REPORT: &'static str = "report";
    pub const DEFENSE: &'static str = "defense";
}

impl std::fmt::Display for ScaleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScaleType::Deliverable => Self::DELIVERABLE,
            ScaleType::Report => Self::REPORT,
            ScaleType::Defense => Self::DEFENSE,
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ScaleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::DELIVERABLE => Ok(ScaleType::Deliverable),
            Self::REPORT => Ok(ScaleType::Report),
            Self::DEFENSE => Ok(ScaleType::Defense),
            _ => Err(format!("Invalid grading scale type: {s}")),
        }
    }
}

// 评分方式：按组或按个人
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum NotationMode {
    Group,
    Individual,
}

impl std::fmt::Display for NotationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotationMode::Group => f.write_str("group"),
            NotationMode::Individual => f.write_str("individual"),
        }
    }
}

impl std::str::FromStr for NotationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(NotationMode::Group),
            "individual" => Ok(NotationMode::Individual),
            _ => Err(format!("Invalid notation mode: {s}")),
        }
    }
}

/// 评分表生命周期
///
/// 只能从 `Draft` 走到 `Validated`，不存在反向操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleState {
    Draft,
    Validated { validated_at: DateTime<Utc> },
}

impl ScaleState {
    /// 由数据库列还原状态；已确认但缺少时间戳时以 UNIX 纪元兜底
    pub fn from_columns(is_validated: bool, validated_at: Option<i64>) -> Self {
        if is_validated {
            ScaleState::Validated {
                validated_at: validated_at
                    .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
                    .unwrap_or_default(),
            }
        } else {
            ScaleState::Draft
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, ScaleState::Validated { .. })
    }

    pub fn validated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ScaleState::Draft => None,
            ScaleState::Validated { validated_at } => Some(*validated_at),
        }
    }
}

/// 评分结果的对象：某个分组或某个学生，二者必居其一
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTarget {
    Group(Uuid),
    Student(Uuid),
}

impl ResultTarget {
    pub fn notation_mode(&self) -> NotationMode {
        match self {
            ResultTarget::Group(_) => NotationMode::Group,
            ResultTarget::Student(_) => NotationMode::Individual,
        }
    }

    pub fn group_id(&self) -> Option<Uuid> {
        match self {
            ResultTarget::Group(id) => Some(*id),
            ResultTarget::Student(_) => None,
        }
    }

    pub fn student_id(&self) -> Option<Uuid> {
        match self {
            ResultTarget::Student(id) => Some(*id),
            ResultTarget::Group(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingResult {
    pub id: Uuid,
    pub criterion_id: Uuid,
    pub target_group_id: Option<Uuid>,
    pub target_student_id: Option<Uuid>,
    pub score: f64,
    pub comment: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingCriterion {
    pub id: Uuid,
    pub scale_id: Uuid,
    pub label: String,
    pub max_points: f64,
    pub weight: Option<f64>,
    pub comment_enabled: bool,
    pub position: i32,
    pub results: Vec<GradingResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingScale {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub scale_type: ScaleType,
    pub target_id: Uuid,
    pub notation_mode: NotationMode,
    pub title: String,
    pub is_validated: bool,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub criteria: Vec<GradingCriterion>,
}

impl GradingScale {
    pub fn state(&self) -> ScaleState {
        if self.is_validated {
            ScaleState::Validated {
                validated_at: self.validated_at.unwrap_or_default(),
            }
        } else {
            ScaleState::Draft
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_columns() {
        assert_eq!(ScaleState::from_columns(false, None), ScaleState::Draft);
        // 草稿状态忽略残留的时间戳
        assert_eq!(ScaleState::from_columns(false, Some(10)), ScaleState::Draft);

        let state = ScaleState::from_columns(true, Some(1_700_000_000));
        assert!(state.is_validated());
        assert_eq!(
            state.validated_at().map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_target_matches_notation_mode() {
        let id = Uuid::new_v4();
        assert_eq!(ResultTarget::Group(id).notation_mode(), NotationMode::Group);
        assert_eq!(
            ResultTarget::Student(id).notation_mode(),
            NotationMode::Individual
        );
        assert_eq!(ResultTarget::Student(id).group_id(), None);
        assert_eq!(ResultTarget::Student(id).student_id(), Some(id));
    }

    #[test]
    fn test_scale_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&ScaleType::Defense).expect("serializable"),
            "\"defense\""
        );
        assert_eq!("report".parse::<ScaleType>(), Ok(ScaleType::Report));
        assert!("livrable".parse::<ScaleType>().is_err());
    }
}
