//! HR vertical slice: the employee directory.
//!
//! [`EmployeeService`] sits between the HTTP surface and an
//! [`EmployeeRepository`]. It owns the one business rule (an email belongs
//! to at most one employee) and reports a missing record as `None` rather
//! than as an error.

mod error;
mod memory;
mod model;
mod repository;
mod service;
mod storage;

pub use error::{EmployeeError, EmployeeResult, StorageError};
pub use memory::InMemoryEmployeeRepository;
pub use model::{Employee, EmployeeChanges};
pub use repository::EmployeeRepository;
pub use service::EmployeeService;
pub use storage::SeaOrmEmployeeRepository;
