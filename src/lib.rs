pub mod api;
pub mod auth;
pub mod billing;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod models;
pub mod notify;
pub mod report;

pub use error::{AppError, Result};
