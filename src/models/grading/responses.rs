use super::entities::{GradingResult, GradingScale};
use serde::Serialize;
use ts_rs::TS;

// 项目下的评分表列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingScaleListResponse {
    pub items: Vec<GradingScale>,
}

// 评分表下全部评分结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingResultListResponse {
    pub items: Vec<GradingResult>,
}
