pub mod extractor;
pub mod parameter_error_handler;
pub mod partition;
pub mod validate;

pub use extractor::{SafeCriterionId, SafeId, SafeResultId};
pub use parameter_error_handler::{json_error_handler, query_error_handler};
