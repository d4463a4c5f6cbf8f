use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of dataset files, compared without regard to case.
pub const DATA_EXTENSION: &str = "data";

/// List the regular `*.data` files directly under `dir`, sorted by name.
pub fn find_data_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_data = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(DATA_EXTENSION));
        if is_data {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
