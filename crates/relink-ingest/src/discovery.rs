//! Input file discovery and collection matching.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use relink_model::Collection;
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::reader::read_csv_records;

/// Separator between the collection name and the rest of a file name.
const NAME_SEPARATOR: char = '-';

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Collection name encoded in a file name: the stem up to the first `-`.
///
/// `Stations-Grid view.csv` belongs to `Stations`.
pub fn collection_name_for(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    stem.split(NAME_SEPARATOR)
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Groups files by inferred collection name, keeping filename order.
pub fn discover_collections(files: &[PathBuf]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut discovered: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in files {
        let name = collection_name_for(path);
        if name.is_empty() {
            debug!(path = %path.display(), "skipping file with no collection name");
            continue;
        }
        discovered.entry(name).or_default().push(path.clone());
    }
    discovered
}

/// Loads every CSV file in `dir`, one [`Collection`] per inferred name.
///
/// Files that map to the same collection are concatenated in filename order.
pub fn load_collections(dir: &Path) -> Result<Vec<Collection>> {
    let files = list_csv_files(dir)?;
    let discovered = discover_collections(&files);

    let mut collections = Vec::with_capacity(discovered.len());
    for (name, paths) in discovered {
        let mut records = Vec::new();
        for path in &paths {
            let rows = read_csv_records(path)?;
            debug!(
                collection = %name,
                path = %path.display(),
                rows = rows.len(),
                "read input file"
            );
            records.extend(rows);
        }
        collections.push(Collection::new(name, records));
    }
    info!(
        dir = %dir.display(),
        files = files.len(),
        collections = collections.len(),
        "loaded input tables"
    );
    Ok(collections)
}
