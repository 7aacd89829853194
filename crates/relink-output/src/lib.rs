//! Output writers for normalized tables.

mod error;
mod writer;

pub use error::{OutputError, Result};
pub use writer::{
    OutputOptions, ensure_output_dir, output_path, table_to_csv_string, write_table, write_tables,
};
