//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod student;

pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
