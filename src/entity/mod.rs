//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! 时间统一以 UNIX 秒存储，转换为业务实体时还原为 `DateTime<Utc>`。

pub mod prelude;

pub mod batch_students;
pub mod grading_criteria;
pub mod grading_results;
pub mod grading_scales;
pub mod group_members;
pub mod orals;
pub mod project_groups;
pub mod projects;
pub mod steps;
pub mod student_batches;
