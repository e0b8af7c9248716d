pub mod employee;
pub mod credential;

pub use credential::{CredentialRow, AuthorityRow};
pub use employee::{Employee, UNSAVED_ID};
