//! Telegram login and per-user task list backend.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod telegram;

pub use api::{create_router, AppState};
pub use config::Config;
