// warpdb-inspect - read-only inspection of JSON payload rows in a local SQLite file
// This is the library root that exposes the public API

pub mod config;
pub mod error;
pub mod query;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::{default_db_path, warp_data_dir, OutputFormat, Platform, ScanConfig};
pub use error::{InspectError, Result};
pub use query::{
    executor::{IdLine, Match, ScanReport, Scanner},
    filter::{Filter, Preset, Term},
    parser::{QueryParser, ReadOnlySelect},
};
pub use storage::{source::TableSource, Payload, PayloadRow, RowId};
