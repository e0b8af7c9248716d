pub mod manager;
pub mod memory;
pub mod models;
pub mod patch;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryEmployeeRepository;
pub use models::Employee;
pub use patch::{EmployeePatch, PatchError};
pub use repository::{EmployeeRepository, PgEmployeeRepository};
