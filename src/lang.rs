#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Programming languages a detector scan can be configured for.
///
/// Each language maps to the set of file-name suffixes recognized as source
/// files for that language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// Java sources (`.java`)
    Java,
    /// C and C++ sources and headers
    C,
    /// C# sources (`.cs`)
    CSharp,
    /// Scheme sources (`.scm`)
    Scheme,
    /// PL/SQL sources (`.sql`, `.pls`, `.pks`)
    PlSql,
    /// Pascal sources
    Pascal,
    /// Perl sources (`.pl`)
    Perl,
    /// Python sources (`.py`)
    Python,
    /// Visual Basic sources (`.vb`)
    VisualBasic,
    /// JavaScript sources (`.js`)
    JavaScript,
    /// Plain text submissions (`.txt`)
    Text,
}

impl Language {
    /// Returns the recognized file-name suffixes for this language,
    /// including the common case variants, canonical suffix first.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Java => &["java", "JAVA", "Java"],
            Language::C => &["h", "c", "cpp", "C", "CPP", "H"],
            Language::CSharp => &["cs", "CS", "Cs"],
            Language::Scheme => &["scm", "SCM"],
            Language::PlSql => &["sql", "pls", "pks"],
            Language::Pascal => &["pas", "tp", "bp", "p"],
            Language::Perl => &["pl", "PL"],
            Language::Python => &["py", "PY"],
            Language::VisualBasic => &["vb", "VB", "Vb"],
            Language::JavaScript => &["js", "JS", "Js"],
            Language::Text => &["txt"],
        }
    }

    /// Returns the language tag as the detectors spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::C => "c",
            Language::CSharp => "c#",
            Language::Scheme => "scheme",
            Language::PlSql => "plsql",
            Language::Pascal => "pascal",
            Language::Perl => "perl",
            Language::Python => "python",
            Language::VisualBasic => "vb",
            Language::JavaScript => "javascript",
            Language::Text => "text",
        }
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    /// Parses a detector language tag. Unknown tags are an error rather
    /// than an implicit "no filtering" wildcard.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "c#" => Ok(Language::CSharp),
            "scheme" => Ok(Language::Scheme),
            "plsql" => Ok(Language::PlSql),
            "pascal" => Ok(Language::Pascal),
            "perl" => Ok(Language::Perl),
            "python" => Ok(Language::Python),
            "vb" => Ok(Language::VisualBasic),
            "javascript" => Ok(Language::JavaScript),
            "text" => Ok(Language::Text),
            other => anyhow::bail!("Unknown language tag: {other}"),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which file names survive extraction.
///
/// The "accept everything" case is an explicit variant; an `Only` filter
/// with an empty list rejects every name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionFilter {
    /// Every file name passes.
    AcceptAll,
    /// Only names whose suffix after the last `.` is an exact,
    /// case-sensitive member of the list pass.
    Only(Vec<String>),
}

impl ExtensionFilter {
    /// Tests one file name against the filter.
    ///
    /// A name without a `.` never passes an `Only` filter.
    pub fn matches(&self, filename: &str) -> bool {
        match self {
            ExtensionFilter::AcceptAll => true,
            ExtensionFilter::Only(extensions) => match filename.rfind('.') {
                Some(dot) => {
                    let ext = &filename[dot + 1..];
                    extensions.iter().any(|e| e == ext)
                }
                None => false,
            },
        }
    }
}

impl From<Language> for ExtensionFilter {
    fn from(language: Language) -> Self {
        ExtensionFilter::Only(language.extensions().iter().map(|e| e.to_string()).collect())
    }
}
