//! CSV table writer.

use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use relink_core::OutputTable;
use tracing::info;

use crate::error::{OutputError, Result};

/// Options for CSV output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Quote every field instead of only those that need it.
    pub quote_all: bool,
}

impl OutputOptions {
    fn quote_style(self) -> QuoteStyle {
        if self.quote_all {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        }
    }
}

/// Creates `dir` and its parents if they do not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// File a table is written to: `<dir>/<collection>.csv`.
pub fn output_path(dir: &Path, table: &OutputTable) -> PathBuf {
    dir.join(format!("{}.csv", table.collection))
}

/// Writes `table` as CSV into `dir`, returning the written path.
pub fn write_table(dir: &Path, table: &OutputTable, options: OutputOptions) -> Result<PathBuf> {
    let path = output_path(dir, table);
    let file = std::fs::File::create(&path).map_err(|source| OutputError::CreateFile {
        path: path.clone(),
        source,
    })?;
    write_csv(file, table, options, &path)?;
    info!(
        collection = %table.collection,
        rows = table.rows.len(),
        path = %path.display(),
        "wrote table"
    );
    Ok(path)
}

/// Writes every table into `dir`, creating it first.
pub fn write_tables(
    dir: &Path,
    tables: &[OutputTable],
    options: OutputOptions,
) -> Result<Vec<PathBuf>> {
    ensure_output_dir(dir)?;
    tables
        .iter()
        .map(|table| write_table(dir, table, options))
        .collect()
}

/// Renders `table` as CSV text.
pub fn table_to_csv_string(table: &OutputTable, options: OutputOptions) -> Result<String> {
    let mut buffer = Vec::new();
    let label = PathBuf::from(format!("{}.csv", table.collection));
    write_csv(&mut buffer, table, options, &label)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_csv<W: Write>(
    sink: W,
    table: &OutputTable,
    options: OutputOptions,
    path: &Path,
) -> Result<()> {
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .quote_style(options.quote_style())
        .from_writer(sink);
    writer.write_record(&table.headers).map_err(csv_error)?;
    for row in &table.rows {
        writer
            .write_record(table.headers.iter().map(|header| row.value(header)))
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|source| OutputError::Flush {
        path: path.to_path_buf(),
        source,
    })
}
