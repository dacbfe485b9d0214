pub mod classifier;
pub mod enricher;
pub mod filter;
pub mod pipeline;
pub mod report;

pub use classifier::RowClassifier;
pub use enricher::DatasetEnricher;
pub use pipeline::DashboardService;
