pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::{AppConfig, MatchingConfig};
pub use error::AppError;
pub use service::ReconcileService;
