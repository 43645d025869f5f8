#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    borrow::Cow,
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use content_inspector::inspect;
use typed_builder::TypedBuilder;
use unrar::Archive;

use crate::{
    lang::ExtensionFilter,
    redact::{Student, redact_comments},
    util,
};

/// Placeholder substituted for a student's id number inside entry names.
const ENTRY_NAME_ID_PLACEHOLDER: &str = "_id_";

/// An enum to represent possible errors while extracting a submission
/// archive.
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    /// The archive could not be opened at all; nothing was written.
    #[error("Could not open archive {path}: {reason}")]
    Open {
        /// Path of the archive that failed to open.
        path:   PathBuf,
        /// Message reported by the archive library.
        reason: String,
    },
    /// An entry could not be read; rar extraction aborts on this.
    #[error("Could not read archive entry {name}: {reason}")]
    Read {
        /// Name of the entry that failed to read.
        name:   String,
        /// Message reported by the archive library.
        reason: String,
    },
    /// Unknown error
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

/// Shared contract for the zip and rar extractors.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ExtractOptions {
    /// Which entry names survive extraction.
    #[builder(default = ExtensionFilter::AcceptAll)]
    pub filter:     ExtensionFilter,
    /// Directory extracted entries are written under, preserving the
    /// archive's internal directory structure.
    #[builder(setter(into))]
    pub output_dir: PathBuf,
    /// Student whose identity is scrubbed from entry names and comments.
    #[builder(default, setter(strip_option))]
    pub student:    Option<Student>,
    /// When set, entries whose bytes are not detected as text are skipped.
    #[builder(default = false)]
    pub text_only:  bool,
}

/// Replaces a non-empty student id number in an entry name with a
/// placeholder.
fn scrub_entry_name(name: &str, student: Option<&Student>) -> String {
    match student.and_then(Student::id_number) {
        Some(id) => name.replace(id, ENTRY_NAME_ID_PLACEHOLDER),
        None => name.to_string(),
    }
}

/// Applies the text-type gate, redaction, and write-out shared by both
/// extractors. Returns whether the entry was written.
fn write_entry(entry_name: &str, buf: &[u8], options: &ExtractOptions) -> Result<bool, ArchiveError> {
    if options.text_only && !inspect(buf).is_text() {
        tracing::debug!("Skipping non-text entry {entry_name}");
        return Ok(false);
    }

    // Redaction only makes sense on text; binary entries pass through
    // untouched when text_only is off. Entries the redactor leaves
    // unchanged are written byte-identical, so non-UTF-8 text encodings
    // survive the lossy round-trip through `&str`.
    let data: Cow<'_, [u8]> = match options.student.as_ref() {
        Some(student) if inspect(buf).is_text() => {
            let text = String::from_utf8_lossy(buf);
            let redacted = redact_comments(&text, Some(student))?;
            if redacted.as_str() == text.as_ref() {
                Cow::Borrowed(buf)
            } else {
                Cow::Owned(redacted.into_bytes())
            }
        }
        _ => Cow::Borrowed(buf),
    };

    let out_path = options.output_dir.join(entry_name);
    let mut handle = util::create_file(&out_path)?;
    handle
        .write_all(&data)
        .with_context(|| format!("Could not write extracted entry {}", out_path.display()))?;
    Ok(true)
}

/// Rejects entry names that would escape the output directory.
fn is_safe_entry_name(name: &str) -> bool {
    let path = Path::new(name);
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}

/// Extracts a zip submission archive into the configured output
/// directory, scrubbing the student's id from entry names and redacting
/// identifying comments along the way.
///
/// Returns whether at least one entry passed the extension and type
/// filters and was written. Unreadable individual entries are skipped;
/// only an archive that cannot be opened fails the whole call.
pub fn extract_zip(zipfile: &Path, options: &ExtractOptions) -> Result<bool, ArchiveError> {
    let file = File::open(zipfile).map_err(|e| ArchiveError::Open {
        path:   zipfile.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Open {
        path:   zipfile.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut has_valid_file = false;
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable zip entry {index}: {e}");
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        if entry.enclosed_name().is_none() {
            tracing::warn!("Skipping unsafe zip entry name {}", entry.name());
            continue;
        }

        let entry_name = scrub_entry_name(entry.name(), options.student.as_ref());
        if !options.filter.matches(&entry_name) {
            continue;
        }

        let mut buf = Vec::with_capacity(entry.size() as usize);
        if let Err(e) = entry.read_to_end(&mut buf) {
            tracing::warn!("Skipping unreadable zip entry {entry_name}: {e}");
            continue;
        }

        has_valid_file |= write_entry(&entry_name, &buf, options)?;
    }

    Ok(has_valid_file)
}

/// Extracts a rar submission archive, with the same contract as
/// [`extract_zip`] except that a failed entry read aborts the whole
/// extraction.
pub fn extract_rar(rarfile: &Path, options: &ExtractOptions) -> Result<bool, ArchiveError> {
    tracing::info!("Extracting rar file {}", rarfile.display());
    let mut archive =
        Archive::new(rarfile)
            .open_for_processing()
            .map_err(|e| ArchiveError::Open {
                path:   rarfile.to_path_buf(),
                reason: e.to_string(),
            })?;

    let mut has_valid_file = false;
    loop {
        let header = match archive.read_header() {
            Ok(Some(header)) => header,
            Ok(None) => break,
            Err(e) => {
                return Err(ArchiveError::Read {
                    name:   rarfile.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let is_file = header.entry().is_file();
        let raw_name = header.entry().filename.to_string_lossy().into_owned();
        let entry_name = scrub_entry_name(&raw_name, options.student.as_ref());

        archive = if is_file && is_safe_entry_name(&entry_name) && options.filter.matches(&entry_name)
        {
            let (data, rest) = header.read().map_err(|e| ArchiveError::Read {
                name:   entry_name.clone(),
                reason: e.to_string(),
            })?;
            has_valid_file |= write_entry(&entry_name, &data, options)?;
            rest
        } else {
            header.skip().map_err(|e| ArchiveError::Read {
                name:   entry_name.clone(),
                reason: e.to_string(),
            })?
        };
    }

    Ok(has_valid_file)
}
