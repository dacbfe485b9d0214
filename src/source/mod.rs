pub mod cache;
pub mod csv_loader;
pub mod export;

pub use cache::DatasetCache;
pub use csv_loader::{load_table, read_table, read_table_bytes};
pub use export::write_view_csv;
