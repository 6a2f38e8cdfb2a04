use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::OptionalExtension;

use super::DbConn;
use crate::domain::{Employee, EmployeeId, EmployeeLookup};

/// Repository for employee operations.
///
/// Keeps an identity cache so repeated lookups of the same row return the
/// same `Arc<Employee>`.
pub struct EmployeeRepository {
    conn: DbConn,
    cache: Mutex<HashMap<EmployeeId, Arc<Employee>>>,
}

impl EmployeeRepository {
    pub fn new(conn: DbConn) -> Self {
        Self {
            conn,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Create the employees table if it does not exist yet.
    pub fn create_table(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                job_title TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Drop the employees table if present.
    pub fn drop_table(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("DROP TABLE IF EXISTS employees;")?;
        self.cache.lock().unwrap().clear();
        Ok(())
    }

    /// Insert a new employee and return the shared, persisted instance.
    pub fn create(&self, name: &str, job_title: &str) -> Result<Arc<Employee>> {
        let id = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO employees (name, job_title) VALUES (?1, ?2)",
                (name, job_title),
            )?;
            conn.last_insert_rowid()
        };
        log::debug!("created employee {id} ({name})");

        let employee = Arc::new(Employee {
            id: Some(id),
            name: name.to_string(),
            job_title: job_title.to_string(),
        });
        self.cache.lock().unwrap().insert(id, employee.clone());
        Ok(employee)
    }
}

impl EmployeeLookup for EmployeeRepository {
    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Arc<Employee>>> {
        if let Some(employee) = self.cache.lock().unwrap().get(&id).cloned() {
            return Ok(Some(employee));
        }

        let row = {
            let conn = self.conn.lock().unwrap();
            let mut stmt =
                conn.prepare("SELECT id, name, job_title FROM employees WHERE id = ?1")?;
            stmt.query_row([id], |row| {
                Ok(Employee {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    job_title: row.get(2)?,
                })
            })
            .optional()?
        };

        match row {
            Some(employee) => {
                let employee = Arc::new(employee);
                self.cache.lock().unwrap().insert(id, employee.clone());
                Ok(Some(employee))
            }
            None => Ok(None),
        }
    }
}
