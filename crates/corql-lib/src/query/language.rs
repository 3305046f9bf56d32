use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Source languages with a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Graph constraints over annotated nodes.
    Annis,
    /// Token and span sequences.
    Poliqarp,
    /// Boolean metadata filters.
    Collection,
    /// Library-style boolean search.
    Cql,
    /// Federated content search.
    Fcsql,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Annis,
        Language::Poliqarp,
        Language::Collection,
        Language::Cql,
        Language::Fcsql,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Language::Annis => "annis",
            Language::Poliqarp => "poliqarp",
            Language::Collection => "collection",
            Language::Cql => "cql",
            Language::Fcsql => "fcsql",
        }
    }

    /// Filter languages install their result under `collection`.
    pub fn is_filter(self) -> bool {
        matches!(self, Language::Collection)
    }

    /// Whether `/.../` delimits a regex in this language's queries.
    pub fn has_slash_regexes(self) -> bool {
        matches!(
            self,
            Language::Annis | Language::Poliqarp | Language::Collection
        )
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "annis" | "aql" => Ok(Language::Annis),
            "poliqarp" | "poliqarpplus" => Ok(Language::Poliqarp),
            "collection" | "cosmas2" => Ok(Language::Collection),
            "cql" => Ok(Language::Cql),
            "fcsql" => Ok(Language::Fcsql),
            _ => Err(Error::UnknownLanguage(tag.to_owned())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
