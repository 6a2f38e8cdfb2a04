//! Domain types for revstore.
//! Defines the review and employee entities and their validation rules.

pub mod employee;
pub mod error;
pub mod review;

pub use employee::*;
pub use error::*;
pub use review::*;
