use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for an employee row.
pub type EmployeeId = i64;

/// An employee that reviews are written about.
///
/// Employees are handed out as `Arc<Employee>` so that a review holds a
/// same-process reference, not merely an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Storage id, `Some` once the employee has been persisted.
    pub id: Option<EmployeeId>,
    pub name: String,
    pub job_title: String,
}

/// Lookup collaborator used to hydrate the employee reference when a review
/// is reconstructed from a stored row.
pub trait EmployeeLookup {
    /// Resolve an employee by id; absent rows are `Ok(None)`.
    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Arc<Employee>>>;
}
