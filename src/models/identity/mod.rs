pub mod entities;

pub use entities::{Credential, Identity, UserRole};
