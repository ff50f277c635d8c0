pub mod grading_scales;

pub mod groups;

pub mod orals;

pub mod projects;

pub mod student_batches;

pub use grading_scales::configure_grading_scales_routes;
pub use groups::configure_groups_routes;
pub use orals::configure_orals_routes;
pub use projects::configure_projects_routes;
pub use student_batches::configure_student_batches_routes;
