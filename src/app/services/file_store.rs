//! Whole-file line I/O for the data files
//!
//! The store never seeks inside a file: it reads every line, rewrites every
//! line, or appends one. Full rewrites go through a temporary file in the same
//! directory that is renamed over the target, so a crash mid-write leaves the
//! previous contents in place.

use crate::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Create the file with a single header line if it does not exist yet
///
/// Returns `true` when the file was created. An existing file is left
/// untouched, whatever its header says.
pub fn initialize(path: &Path, headers: &[&str], separator: char) -> Result<bool> {
    if path.exists() {
        debug!("Data file already present: {}", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io(format!("Failed to create directory {}", parent.display()), e)
        })?;
    }

    let header = headers.join(&separator.to_string());
    fs::write(path, format!("{}\n", header))
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;

    info!("Created data file {}", path.display());
    Ok(true)
}

/// Read every line of a file, header included
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Replace the whole file with the given lines
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(directory).map_err(|e| {
        Error::io(
            format!("Failed to create temporary file in {}", directory.display()),
            e,
        )
    })?;

    let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }

    temp.write_all(content.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;

    temp.persist(path)
        .map_err(|e| Error::io(format!("Failed to replace {}", path.display()), e.error))?;

    debug!("Rewrote {} lines to {}", lines.len(), path.display());
    Ok(())
}

/// Append one line and its terminator
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(format!("Failed to open {} for append", path.display()), e))?;

    file.write_all(format!("{}\n", line).as_bytes())
        .map_err(|e| Error::io(format!("Failed to append to {}", path.display()), e))?;

    Ok(())
}
