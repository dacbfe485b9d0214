pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod source;

pub use crate::config::{AppConfig, BusinessRules};
pub use error::PipelineError;
pub use service::{DashboardService, DatasetEnricher, RowClassifier};
pub use source::DatasetCache;
