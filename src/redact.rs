#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::LazyLock;

use anyhow::{Context, Result};
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder substituted for a student's first name.
pub const FIRSTNAME_PLACEHOLDER: &str = "#firstname";
/// Placeholder substituted for a student's last name.
pub const LASTNAME_PLACEHOLDER: &str = "#lastname";
/// Placeholder substituted for a student's id number.
pub const ID_PLACEHOLDER: &str = "#id";

/// Matches C-style block comments, non-greedy, spanning newlines.
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));

/// Matches line comments up to the end of the line.
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("line comment pattern is valid"));

/// The student whose identity must not reach a third-party scanning
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// First name as enrolled.
    pub first_name: String,
    /// Last name as enrolled.
    pub last_name:  String,
    /// Institutional id number, when one is recorded.
    pub id_number:  Option<String>,
}

impl Student {
    /// Returns the id number when present and non-empty.
    pub fn id_number(&self) -> Option<&str> {
        self.id_number.as_deref().filter(|id| !id.is_empty())
    }
}

/// Builds a case-insensitive matcher for a literal needle.
fn literal_ci(needle: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){}", regex::escape(needle)))
        .with_context(|| format!("Could not build matcher for {needle:?}"))
}

/// Redacts student-identifying comments from `text` before it is uploaded
/// to a scanning service.
///
/// Comments that mention the student's first name, last name, or id number
/// keep their shape with those substrings replaced by placeholder tokens.
/// Comments that contain the literal word `author` without a recognizable
/// name are deleted whole, in case the student wrote their name in another
/// form. With no student record the text is returned untouched.
pub fn redact_comments(text: &str, student: Option<&Student>) -> Result<String> {
    let Some(student) = student else {
        return Ok(text.to_string());
    };

    let first_name = student.first_name.trim();
    let last_name = student.last_name.trim();
    let first = (!first_name.is_empty()).then(|| literal_ci(first_name)).transpose()?;
    let last = (!last_name.is_empty()).then(|| literal_ci(last_name)).transpose()?;
    let id = student.id_number();

    let comments = BLOCK_COMMENT
        .find_iter(text)
        .chain(LINE_COMMENT.find_iter(text))
        .map(|m| m.as_str());

    // Ordered find/replace pairs over the whole text; the first pair
    // registered for a repeated comment string wins.
    let replacements: Vec<(&str, String)> = comments
        .filter_map(|comment| {
            let names_match = first.as_ref().is_some_and(|re| re.is_match(comment))
                || last.as_ref().is_some_and(|re| re.is_match(comment));
            let id_match = id.is_some_and(|id| comment.contains(id));

            if names_match || id_match {
                let mut redacted = comment.to_string();
                if let Some(re) = first.as_ref() {
                    redacted = re.replace_all(&redacted, FIRSTNAME_PLACEHOLDER).into_owned();
                }
                if let Some(re) = last.as_ref() {
                    redacted = re.replace_all(&redacted, LASTNAME_PLACEHOLDER).into_owned();
                }
                if let Some(id) = id {
                    redacted = redacted.replace(id, ID_PLACEHOLDER);
                }
                Some((comment, redacted))
            } else if comment.contains("author") {
                Some((comment, String::new()))
            } else {
                None
            }
        })
        .unique_by(|(find, _)| *find)
        .collect();

    let mut redacted = text.to_string();
    for (find, replace) in replacements {
        redacted = redacted.replace(find, &replace);
    }
    Ok(redacted)
}
