//! 预导入模块，方便使用

pub use super::batch_students::{
    ActiveModel as BatchStudentActiveModel, Entity as BatchStudents, Model as BatchStudentModel,
};
pub use super::grading_criteria::{
    ActiveModel as GradingCriterionActiveModel, Entity as GradingCriteria,
    Model as GradingCriterionModel,
};
pub use super::grading_results::{
    ActiveModel as GradingResultActiveModel, Entity as GradingResults,
    Model as GradingResultModel,
};
pub use super::grading_scales::{
    ActiveModel as GradingScaleActiveModel, Entity as GradingScales, Model as GradingScaleModel,
};
pub use super::group_members::{
    ActiveModel as GroupMemberActiveModel, Entity as GroupMembers, Model as GroupMemberModel,
};
pub use super::orals::{ActiveModel as OralActiveModel, Entity as Orals, Model as OralModel};
pub use super::project_groups::{
    ActiveModel as ProjectGroupActiveModel, Entity as ProjectGroups, Model as ProjectGroupModel,
};
pub use super::projects::{
    ActiveModel as ProjectActiveModel, Entity as Projects, Model as ProjectModel,
};
pub use super::steps::{ActiveModel as StepActiveModel, Entity as Steps, Model as StepModel};
pub use super::student_batches::{
    ActiveModel as StudentBatchActiveModel, Entity as StudentBatches, Model as StudentBatchModel,
};
