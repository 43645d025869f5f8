//! # moss-utils
//!
//! Submission-processing utilities for integrating programming-assignment
//! plagiarism detectors (MOSS, JPlag) into a course-management host
//! application.
//!
//! The crate prepares student submissions for upload to a detector
//! (archive extraction, language-based file filtering, redaction of
//! student-identifying comments), fetches scan results in parallel, and
//! reports scan progress and completion back to the host through injected
//! store/mail/directory handles.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// For zip and rar submission-archive extraction
pub mod archive;
/// Environment-driven configuration shared across the crate
pub mod config;
/// For fetching detector result pages in parallel
pub mod download;
/// Language tags, their file extensions, and extension filtering
pub mod lang;
/// For notifying graders when a scan completes
pub mod notify;
/// For reporting scan progress into a persisted status record
pub mod progress;
/// For redacting student-identifying comments from source code
pub mod redact;
/// Filesystem helpers shared by extraction and download
pub mod util;

pub use archive::{ArchiveError, ExtractOptions, extract_rar, extract_zip};
pub use download::{Destination, download_all};
pub use lang::{ExtensionFilter, Language};
pub use progress::{Detector, ProgressHandler, ProgressRecord, ProgressStore};
pub use redact::{Student, redact_comments};
