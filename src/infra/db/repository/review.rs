use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use rusqlite::OptionalExtension;

use super::DbConn;
use crate::domain::{
    Employee, EmployeeId, EmployeeLookup, Review, ReviewError, ReviewHandle, ReviewId,
};

/// A `reviews` row as read from storage, before hydration.
struct ReviewRow {
    id: ReviewId,
    year: i32,
    summary: String,
    employee_id: EmployeeId,
}

const SELECT_COLUMNS: &str = "SELECT id, year, summary, employee_id FROM reviews";

/// Repository for review operations.
///
/// Owns the identity map from row id to shared instance, so repeated loads of
/// the same row return the same handle. The employee reference is hydrated
/// through the injected [`EmployeeLookup`] collaborator.
pub struct ReviewRepository {
    conn: DbConn,
    employees: Arc<dyn EmployeeLookup + Send + Sync>,
    cache: Mutex<HashMap<ReviewId, ReviewHandle>>,
}

impl ReviewRepository {
    pub fn new(conn: DbConn, employees: Arc<dyn EmployeeLookup + Send + Sync>) -> Self {
        Self {
            conn,
            employees,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Create the reviews table if it does not exist yet.
    pub fn create_table(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                year INTEGER,
                summary TEXT,
                employee_id INTEGER REFERENCES employees(id)
            );
            "#,
        )?;
        Ok(())
    }

    /// Drop the reviews table if present.
    pub fn drop_table(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("DROP TABLE IF EXISTS reviews;")?;
        self.cache.lock().unwrap().clear();
        Ok(())
    }

    /// Persist a review: insert when it has no id yet (assigning the
    /// generated id back onto the instance), update the existing row
    /// otherwise. The handle is (re)inserted into the identity map either way.
    pub fn save(&self, review: &ReviewHandle) -> Result<()> {
        let id = {
            let mut rev = review.lock().unwrap();
            let employee_id = rev
                .employee()
                .id
                .ok_or(crate::domain::ValidationError::UnsavedEmployee)?;
            let conn = self.conn.lock().unwrap();
            match rev.id() {
                None => {
                    conn.execute(
                        "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3)",
                        (rev.year(), rev.summary(), employee_id),
                    )?;
                    let id = conn.last_insert_rowid();
                    rev.record_id(id);
                    log::debug!("inserted review {id}");
                    id
                }
                Some(id) => {
                    conn.execute(
                        "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4",
                        (rev.year(), rev.summary(), employee_id, id),
                    )?;
                    log::debug!("updated review {id}");
                    id
                }
            }
        };

        self.cache.lock().unwrap().insert(id, review.clone());
        Ok(())
    }

    /// Construct a validated review and persist it immediately.
    pub fn create(
        &self,
        year: i32,
        summary: impl Into<String>,
        employee: Arc<Employee>,
    ) -> Result<ReviewHandle> {
        let review = Review::new(year, summary, employee)?;
        let handle = Arc::new(Mutex::new(review));
        self.save(&handle)?;
        Ok(handle)
    }

    /// Look up a review by id; absent rows are `Ok(None)`.
    pub fn find_by_id(&self, id: ReviewId) -> Result<Option<ReviewHandle>> {
        let row = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            stmt.query_row([id], read_row).optional()?
        };

        match row {
            Some(row) => self.instance_from_row(row).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch every persisted review, one handle per row.
    pub fn get_all(&self) -> Result<Vec<ReviewHandle>> {
        let rows = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
            let rows = stmt.query_map([], read_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        rows.into_iter()
            .map(|row| self.instance_from_row(row))
            .collect()
    }

    /// Alias for [`save`](Self::save); an already-persisted review is updated
    /// in place.
    pub fn update(&self, review: &ReviewHandle) -> Result<()> {
        self.save(review)
    }

    /// Delete the backing row, evict the identity-map entry, and reset the
    /// instance's id. Fails when the review was never persisted.
    pub fn delete(&self, review: &ReviewHandle) -> Result<()> {
        let mut rev = review.lock().unwrap();
        let id = rev.id().ok_or(ReviewError::NotPersisted)?;

        self.conn
            .lock()
            .unwrap()
            .execute("DELETE FROM reviews WHERE id = ?1", [id])?;
        self.cache.lock().unwrap().remove(&id);
        rev.clear_id();
        log::debug!("deleted review {id}");
        Ok(())
    }

    /// Map a stored row to its in-memory instance. A cache hit returns the
    /// existing handle, refreshed with the row's fields so writes made
    /// outside this repository become visible on re-read; a miss hydrates the
    /// employee reference, constructs the review, and caches it.
    fn instance_from_row(&self, row: ReviewRow) -> Result<ReviewHandle> {
        let cached = self.cache.lock().unwrap().get(&row.id).cloned();
        if let Some(handle) = cached {
            let employee = self.hydrate_employee(row.employee_id)?;
            handle
                .lock()
                .unwrap()
                .refresh(row.year, row.summary, employee)?;
            return Ok(handle);
        }

        let employee = self.hydrate_employee(row.employee_id)?;
        let review = Review::hydrated(row.id, row.year, row.summary, employee)?;
        let handle = Arc::new(Mutex::new(review));
        self.cache.lock().unwrap().insert(row.id, handle.clone());
        Ok(handle)
    }

    fn hydrate_employee(&self, id: EmployeeId) -> Result<Arc<Employee>> {
        self.employees
            .find_by_id(id)?
            .ok_or_else(|| anyhow!("review references missing employee {id}"))
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok(ReviewRow {
        id: row.get(0)?,
        year: row.get(1)?,
        summary: row.get(2)?,
        employee_id: row.get(3)?,
    })
}
