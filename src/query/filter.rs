// Row filtering
// Payload documents have no known shape, so matching is deliberately loose:
// substring search over the serialized document, or top-level key presence

use super::executor::IdLine;
use crate::error::{InspectError, Result};
use clap::ValueEnum;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Prefix that turns a term into a key-presence check
const KEY_PREFIX: &str = "key:";

/// A single literal filter term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Case-insensitive substring of the compact JSON serialization.
    /// Stored lowercased.
    Contains(String),
    /// Top-level key presence (`key:<name>` on the command line)
    Key(String),
}

impl Term {
    pub fn contains(text: &str) -> Self {
        Term::Contains(text.to_lowercase())
    }

    pub fn key(name: &str) -> Self {
        Term::Key(name.to_string())
    }

    /// `haystack` is the lowercased serialization of `doc`, computed once per row
    fn matches(&self, doc: &Value, haystack: &str) -> bool {
        match self {
            Term::Contains(needle) => haystack.contains(needle.as_str()),
            // Membership in the loose sense: keys of an object, string elements
            // of an array, or a substring of a bare string document
            Term::Key(name) => match doc {
                Value::Object(map) => map.contains_key(name),
                Value::Array(items) => items.iter().any(|item| item.as_str() == Some(name)),
                Value::String(s) => s.contains(name.as_str()),
                Value::Null | Value::Bool(_) | Value::Number(_) => false,
            },
        }
    }
}

impl FromStr for Term {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self> {
        let term = match s.strip_prefix(KEY_PREFIX) {
            Some(name) => Term::key(name),
            None => Term::contains(s),
        };

        match &term {
            Term::Contains(t) | Term::Key(t) if t.is_empty() => {
                Err(InspectError::InvalidTerm(s.to_string()))
            }
            _ => Ok(term),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Contains(t) => write!(f, "{}", t),
            Term::Key(k) => write!(f, "{}{}", KEY_PREFIX, k),
        }
    }
}

/// A disjunction of terms: a document matches when any term matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    terms: Vec<Term>,
}

impl Filter {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// An empty filter accepts every decodable document
    pub fn matches(&self, doc: &Value) -> bool {
        if self.terms.is_empty() {
            return true;
        }

        let haystack = doc.to_string().to_lowercase();
        self.terms.iter().any(|term| term.matches(doc, &haystack))
    }
}

/// Canned term sets for the two questions this tool usually answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// Agent profile records (truncated to 500 characters)
    #[default]
    Profiles,
    /// Anything mentioning a model (printed in full)
    Models,
}

impl Preset {
    pub fn terms(self) -> Vec<Term> {
        match self {
            Preset::Profiles => ["profile", "agent", "default", "claude", "base_model"]
                .into_iter()
                .map(Term::contains)
                .collect(),
            Preset::Models => vec![Term::key("base_model"), Term::contains("model")],
        }
    }

    /// Default output limit in characters; `None` prints the whole document
    pub fn max_chars(self) -> Option<usize> {
        match self {
            Preset::Profiles => Some(500),
            Preset::Models => None,
        }
    }

    /// Header line printed above the matches in text output
    pub fn header(self, source: &str) -> String {
        match self {
            Preset::Profiles => format!("=== {} - looking for agent profiles ===", source),
            Preset::Models => format!("=== 所有 {} 记录 ===", source),
        }
    }

    pub fn id_line(self) -> IdLine {
        match self {
            Preset::Profiles => IdLine::Prefixed,
            Preset::Models => IdLine::Trailing,
        }
    }
}
