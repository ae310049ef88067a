// src/dataset/writer.rs
//! Output files are staged next to their destination and renamed into
//! place, so a failed conversion never leaves a truncated file behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::Result;

/// Write `path` through `fill`, replacing any existing file only on success.
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let staged = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(staged.as_file());
        fill(&mut out)?;
        out.flush()?;
    }
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), "wrote output file");
    Ok(())
}

/// Write a whole string to `path` atomically.
pub fn write_string_atomic(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, |out| {
        out.write_all(content.as_bytes())?;
        Ok(())
    })
}
