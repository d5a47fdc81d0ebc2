//! Database connection pool and operations.

pub mod bill;
pub mod class;
pub mod connection;
pub mod payment;
pub mod schema;
pub mod seed;
pub mod student;
pub mod user;

pub use connection::{TableCounts, connect, get_table_counts, test_connection};
pub use schema::create_schema;
pub use seed::seed_defaults;
