pub mod domain;
pub mod infra;

pub use domain::{
    Employee, EmployeeId, EmployeeLookup, Review, ReviewError, ReviewHandle, ReviewId,
    ValidationError,
};
pub use infra::db::{Database, EmployeeRepository, ReviewRepository};
