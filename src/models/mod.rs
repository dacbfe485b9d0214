pub mod enriched;
pub mod filter;
pub mod labels;
pub mod report;
pub mod shipment;

pub use enriched::{AgingReference, DateMode, EnrichStats, EnrichedDataset, EnrichedShipment};
pub use filter::{month_from_name, month_name, FilterSelection, FilterSpec, MONTH_NAMES};
pub use labels::{AgingBucket, DegradationStatus, RegionalGroup};
pub use report::{
    AgentRow, AgingCount, FailureOverview, FilterOptions, OpenOverview, StatusCount,
    StatusPanel, ViewSummary,
};
pub use shipment::{columns, RawTable, ShipmentRecord};
