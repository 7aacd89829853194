//! Spreadsheet export ingestion.
//!
//! Lists the CSV files of an input folder, infers which collection each
//! file belongs to from its name, and loads rows as [`Record`]s.
//!
//! [`Record`]: relink_model::Record

mod discovery;
mod error;
mod reader;

pub use discovery::{collection_name_for, discover_collections, list_csv_files, load_collections};
pub use error::{IngestError, Result};
pub use reader::read_csv_records;
