//! Infrastructure layer - database and migrations.

mod db;
pub mod migrations;

pub use db::{Database, HealthCheck};
pub use migrations::Migrator;
