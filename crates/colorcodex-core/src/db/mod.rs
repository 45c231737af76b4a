//! Database layer for ColorCodex

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{ColorRepository, LibSqlColorRepository};
