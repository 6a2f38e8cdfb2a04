//! Infrastructure layer: SQLite persistence.

pub mod db;
