//! Repository implementations for data access in revstore.
//!
//! Provides database operations for reviews and employees.

mod employee;
mod review;

pub use employee::EmployeeRepository;
pub use review::ReviewRepository;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Shared SQLite connection handle. `rusqlite::Connection` is not `Sync`,
/// so every operation locks before touching the database.
pub type DbConn = Arc<Mutex<Connection>>;
