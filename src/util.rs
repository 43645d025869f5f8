#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs::File, path::Path};

use anyhow::{Context, Result};

/// Opens `fullpath` for writing, truncating any existing content.
///
/// Every missing ancestor directory along the path is created first, so
/// archive entries with nested relative paths can be written directly.
/// The caller owns closing the returned handle.
pub fn create_file(fullpath: &Path) -> Result<File> {
    if let Some(parent) = fullpath.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create directory {}", parent.display()))?;
    }

    File::create(fullpath).with_context(|| format!("Could not create file {}", fullpath.display()))
}

/// Deletes a directory with all of its subdirectories and files.
///
/// A path that is not a directory is left alone.
pub fn remove_dir_recursive(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Could not delete {}", dir.display()))?;
    }
    Ok(())
}

/// Counts the newlines in `text` and the number of characters on the final
/// line, as detector result parsers expect them.
///
/// The final-line count covers only the characters after the last newline,
/// not the newline itself, so text ending in `\n` reports a final line of
/// length zero.
pub fn count_lines(text: &str) -> (usize, usize) {
    let line_count = text.matches('\n').count();
    let final_line_len = match text.rfind('\n') {
        Some(pos) => text.len() - pos - 1,
        None => text.len(),
    };
    (line_count, final_line_len)
}

/// Whether the file name denotes a compressed submission we can extract.
///
/// Only zip and rar are supported; every other suffix, compressed or not,
/// is treated as a plain file.
pub fn is_compressed_file(filename: &str) -> bool {
    filename.ends_with(".zip") || filename.ends_with(".rar")
}
