use std::sync::{Arc, Mutex};

use crate::domain::employee::Employee;
use crate::domain::error::ValidationError;

/// Unique identifier for a review row.
pub type ReviewId = i64;

/// Shared handle to a review instance.
///
/// The identity map stores handles, so "same row" means `Arc::ptr_eq` on the
/// handles it returns. The mutex serializes field access between callers
/// sharing a repository.
pub type ReviewHandle = Arc<Mutex<Review>>;

/// A performance review for an employee.
///
/// Fields are private and only reachable through validating setters, so an
/// instance can never hold a year before 2000, an empty summary, or an
/// unpersisted employee reference.
#[derive(Debug, Clone)]
pub struct Review {
    id: Option<ReviewId>,
    year: i32,
    summary: String,
    employee: Arc<Employee>,
}

impl Review {
    /// Construct an unsaved review, running all field validators.
    pub fn new(
        year: i32,
        summary: impl Into<String>,
        employee: Arc<Employee>,
    ) -> Result<Self, ValidationError> {
        let summary = summary.into();
        check_year(year)?;
        check_summary(&summary)?;
        check_employee(&employee)?;
        Ok(Self {
            id: None,
            year,
            summary,
            employee,
        })
    }

    /// Storage id, `None` until the first successful insert.
    pub fn id(&self) -> Option<ReviewId> {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn employee(&self) -> &Arc<Employee> {
        &self.employee
    }

    /// Assign the review year; fails for years before 2000.
    pub fn set_year(&mut self, year: i32) -> Result<(), ValidationError> {
        check_year(year)?;
        self.year = year;
        Ok(())
    }

    /// Assign the summary text; fails for empty strings.
    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ValidationError> {
        let summary = summary.into();
        check_summary(&summary)?;
        self.summary = summary;
        Ok(())
    }

    /// Assign the reviewed employee; fails when the employee was never saved.
    pub fn set_employee(&mut self, employee: Arc<Employee>) -> Result<(), ValidationError> {
        check_employee(&employee)?;
        self.employee = employee;
        Ok(())
    }

    /// Record the id assigned by storage on first insert.
    pub(crate) fn record_id(&mut self, id: ReviewId) {
        self.id = Some(id);
    }

    /// Reset the id after the backing row has been deleted.
    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Rebuild a review from a stored row, keeping the stored id.
    pub(crate) fn hydrated(
        id: ReviewId,
        year: i32,
        summary: String,
        employee: Arc<Employee>,
    ) -> Result<Self, ValidationError> {
        let mut review = Self::new(year, summary, employee)?;
        review.record_id(id);
        Ok(review)
    }

    /// Overwrite fields from a freshly read row. Used on identity-map hits so
    /// a re-read reflects writes made outside this process.
    pub(crate) fn refresh(
        &mut self,
        year: i32,
        summary: String,
        employee: Arc<Employee>,
    ) -> Result<(), ValidationError> {
        self.set_year(year)?;
        self.set_summary(summary)?;
        self.set_employee(employee)
    }
}

fn check_year(year: i32) -> Result<(), ValidationError> {
    if year < 2000 {
        return Err(ValidationError::YearOutOfRange(year));
    }
    Ok(())
}

fn check_summary(summary: &str) -> Result<(), ValidationError> {
    if summary.is_empty() {
        return Err(ValidationError::EmptySummary);
    }
    Ok(())
}

fn check_employee(employee: &Employee) -> Result<(), ValidationError> {
    if employee.id.is_none() {
        return Err(ValidationError::UnsavedEmployee);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted_employee() -> Arc<Employee> {
        Arc::new(Employee {
            id: Some(1),
            name: "Ada".into(),
            job_title: "Engineer".into(),
        })
    }

    #[test]
    fn test_new_rejects_year_before_2000() {
        let err = Review::new(1999, "fine", persisted_employee()).unwrap_err();
        assert_eq!(err, ValidationError::YearOutOfRange(1999));
        assert!(Review::new(2000, "fine", persisted_employee()).is_ok());
    }

    #[test]
    fn test_new_rejects_empty_summary() {
        let err = Review::new(2021, "", persisted_employee()).unwrap_err();
        assert_eq!(err, ValidationError::EmptySummary);
    }

    #[test]
    fn test_new_rejects_unsaved_employee() {
        let emp = Arc::new(Employee {
            id: None,
            name: "Ada".into(),
            job_title: "Engineer".into(),
        });
        let err = Review::new(2021, "fine", emp).unwrap_err();
        assert_eq!(err, ValidationError::UnsavedEmployee);
    }

    #[test]
    fn test_failed_setter_keeps_prior_value() {
        let mut review = Review::new(2021, "Good performance", persisted_employee()).unwrap();

        assert!(review.set_year(1995).is_err());
        assert_eq!(review.year(), 2021);

        assert!(review.set_summary("").is_err());
        assert_eq!(review.summary(), "Good performance");

        let unsaved = Arc::new(Employee {
            id: None,
            name: "Bob".into(),
            job_title: "Manager".into(),
        });
        assert!(review.set_employee(unsaved).is_err());
        assert_eq!(review.employee().id, Some(1));
    }

    #[test]
    fn test_setters_accept_valid_values() {
        let mut review = Review::new(2021, "Good performance", persisted_employee()).unwrap();
        review.set_year(2024).unwrap();
        review.set_summary("Exceeded expectations").unwrap();
        assert_eq!(review.year(), 2024);
        assert_eq!(review.summary(), "Exceeded expectations");
    }

    #[test]
    fn test_id_lifecycle() {
        let mut review = Review::new(2021, "Good performance", persisted_employee()).unwrap();
        assert_eq!(review.id(), None);
        review.record_id(7);
        assert_eq!(review.id(), Some(7));
        review.clear_id();
        assert_eq!(review.id(), None);
    }
}
